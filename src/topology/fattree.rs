
use std::collections::BTreeMap;
use std::iter::once;

use ::rand::rngs::StdRng;
use quantifiable_derive::Quantifiable;//the derive macro

use crate::error::Error;
use crate::topology::{AdjacencyList,PhysicalTrafficMatrix,SwitchDescriptor,Topology,format_topology_file,format_traffic_events};

/**
The static three-tier fabric used as the non-reconfigurable baseline. One core switch
on top, one aggregation switch per pod (the pod's full-bisection aggregation layer
logically collapsed into a single device), `num_tors_per_pod` ToRs per pod and one
virtual server group per ToR standing for `eps_radix/2` physical servers.

Device id layout: aggregation switch of pod `p` is `p`; ToR `t` of pod `p` is
`num_pods + p*num_tors_per_pod + t`; the server groups mirror the ToRs offset by
`num_pods*num_tors_per_pod`; the core switch takes the last id.

The core carries `num_reconfigurable_uplinks_per_pod` parallel links to each
aggregation switch, the same fan-out a reconfigurable design of equal sizing would
drive, so that comparisons against the reconfigurable designs are port-for-port fair.
**/
#[derive(Quantifiable)]
#[derive(Debug)]
pub struct FatTree
{
	eps_radix: usize,
	num_pods: usize,
	num_tors_per_pod: usize,
	oversubscription_ratio: (usize,usize),
	num_reconfigurable_uplinks_per_pod: usize,
	adjacency: AdjacencyList,
	device_id_to_pod_id: BTreeMap<usize,usize>,
}

impl Topology for FatTree
{
	fn wire_network(&mut self, _rng:&mut StdRng) -> Result<(),Error>
	{
		let core_switch_id = self.core_switch_id();
		self.adjacency.add_device(core_switch_id);
		for pod_id in 0..self.num_pods
		{
			//One collapsed aggregation switch per pod, wired up to the core.
			let aggregation_id = pod_id;
			self.adjacency.add_device(aggregation_id);
			self.device_id_to_pod_id.insert(aggregation_id,pod_id);
			self.adjacency.add_link(aggregation_id,core_switch_id,self.num_reconfigurable_uplinks_per_pod);
			for tor in 0..self.num_tors_per_pod
			{
				let tor_id = self.num_pods + pod_id*self.num_tors_per_pod + tor;
				let server_id = self.num_pods*(1+self.num_tors_per_pod) + pod_id*self.num_tors_per_pod + tor;
				self.adjacency.add_device(tor_id);
				self.adjacency.add_device(server_id);
				self.adjacency.add_link(tor_id,aggregation_id,self.eps_radix/2);
				self.adjacency.add_link(server_id,tor_id,self.eps_radix/2);
				self.device_id_to_pod_id.insert(tor_id,pod_id);
				self.device_id_to_pod_id.insert(server_id,pod_id);
			}
		}
		//The core switch is deliberately left out of the pod map: it is not pod-scoped.
		Ok(())
	}
	fn adjacency(&self) -> &AdjacencyList
	{
		&self.adjacency
	}
	fn device_pods(&self) -> &BTreeMap<usize,usize>
	{
		&self.device_id_to_pod_id
	}
	fn eps_radix(&self) -> usize
	{
		self.eps_radix
	}
	fn num_pods(&self) -> usize
	{
		self.num_pods
	}
	fn topology_file_string(&self) -> String
	{
		let tor_range = (self.num_pods, self.num_pods*(1+self.num_tors_per_pod)-1);
		let server_range = (self.num_pods*(1+self.num_tors_per_pod), self.num_pods*(1+2*self.num_tors_per_pod)-1);
		let switches = SwitchDescriptor::Explicit((0..self.num_pods).chain(once(self.core_switch_id())).collect());
		format_topology_file(&self.adjacency,tor_range,server_range,&switches)
	}
	fn traffic_events_string(&self, traffic:&PhysicalTrafficMatrix) -> String
	{
		let virtual_servers_offset = self.num_pods*(1+self.num_tors_per_pod);
		format_traffic_events(&self.adjacency,virtual_servers_offset,self.eps_radix/2,traffic)
	}
	fn num_reconfigurable_uplinks_per_pod(&self) -> usize
	{
		//Nothing is reconfigured here, but the caller labels artifacts with the
		//equivalent fan-out of the reconfigurable designs.
		self.num_reconfigurable_uplinks_per_pod
	}
	fn name(&self) -> String
	{
		format!("fattree_eps{}_np{}_ntpp{}_{}to{}",self.eps_radix,self.num_pods,self.num_tors_per_pod,self.oversubscription_ratio.0,self.oversubscription_ratio.1)
	}
}

impl FatTree
{
	pub fn new(eps_radix:usize, num_pods:usize, num_tors_per_pod:usize, oversubscription_ratio:(usize,usize)) -> FatTree
	{
		assert!(eps_radix%2==0,"the switch radix {} must be even, half access and half uplink",eps_radix);
		assert!(oversubscription_ratio.0>0 && oversubscription_ratio.1>0,"degenerate oversubscription ratio {}:{}",oversubscription_ratio.0,oversubscription_ratio.1);
		let num_reconfigurable_uplinks_per_pod = num_tors_per_pod*(eps_radix/2)*oversubscription_ratio.1/oversubscription_ratio.0;
		assert!(num_reconfigurable_uplinks_per_pod > num_pods-1,"{} uplinks per pod cannot reach the other {} pods",num_reconfigurable_uplinks_per_pod,num_pods-1);
		FatTree{
			eps_radix,
			num_pods,
			num_tors_per_pod,
			oversubscription_ratio,
			num_reconfigurable_uplinks_per_pod,
			adjacency: AdjacencyList::new(),
			device_id_to_pod_id: BTreeMap::new(),
		}
	}
	fn core_switch_id(&self) -> usize
	{
		self.num_pods + 2*self.num_pods*self.num_tors_per_pod
	}
}
