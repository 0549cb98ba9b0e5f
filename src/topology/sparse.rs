
use std::collections::BTreeMap;

use ::rand::rngs::StdRng;
use quantifiable_derive::Quantifiable;//the derive macro

use crate::error::Error;
use crate::topology::{AdjacencyList,PhysicalTrafficMatrix,SwitchDescriptor,Topology,format_topology_file,format_traffic_events,format_uniform_interpod_routing_weights};

/**
The ToR-level reconfigurable fabric. Every pod is a single ToR switch (doubling as the
pod's only aggregation point) with one virtual server group on `eps_radix/2` links.

The initial interpod logical topology is a uniform full mesh with exactly one link per
ordered ToR pair. This stands in for a rotating time-varying schedule in the style of
RotorNet: the mesh is the time-average the schedule realizes, not a port-feasible
static wiring, which is why the interpod degree is allowed to exceed the radix.

Device id layout: ToR of pod `p` is `p`, its server group is `num_tors + p`.
**/
#[derive(Quantifiable)]
#[derive(Debug)]
pub struct SparseReconfigurable
{
	eps_radix: usize,
	num_pods: usize,
	///Server-facing radix per ToR; the group stands for half as many physical servers.
	///`None` defaults to `eps_radix`.
	num_servers_per_tor: Option<usize>,
	adjacency: AdjacencyList,
	device_id_to_pod_id: BTreeMap<usize,usize>,
}

impl Topology for SparseReconfigurable
{
	fn wire_network(&mut self, _rng:&mut StdRng) -> Result<(),Error>
	{
		for pod_id in 0..self.num_pods
		{
			let tor_id = pod_id;
			let server_id = self.num_pods + pod_id;
			self.adjacency.add_device(tor_id);
			self.adjacency.add_device(server_id);
			self.adjacency.add_link(server_id,tor_id,self.eps_radix/2);
			self.device_id_to_pod_id.insert(tor_id,pod_id);
			self.device_id_to_pod_id.insert(server_id,pod_id);
		}
		//The uniform mesh standing in for the rotation schedule.
		for i in 0..self.num_pods
		{
			for j in i+1..self.num_pods
			{
				self.adjacency.add_link(i,j,1);
			}
		}
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
		let tor_range = (0,self.num_pods-1);
		let server_range = (self.num_pods,2*self.num_pods-1);
		format_topology_file(&self.adjacency,tor_range,server_range,&SwitchDescriptor::Explicit(vec![]))
	}
	fn interpod_routing_weights_string(&self) -> String
	{
		format_uniform_interpod_routing_weights(self.num_pods)
	}
	fn traffic_events_string(&self, traffic:&PhysicalTrafficMatrix) -> String
	{
		let physical_servers_per_group = match self.num_servers_per_tor
		{
			Some(server_radix) => server_radix/2,
			None => self.eps_radix/2,
		};
		format_traffic_events(&self.adjacency,self.num_pods,physical_servers_per_group,traffic)
	}
	fn num_reconfigurable_uplinks_per_pod(&self) -> usize
	{
		self.eps_radix/2
	}
	fn name(&self) -> String
	{
		format!("tor_eps{}_np{}",self.eps_radix,self.num_pods)
	}
}

impl SparseReconfigurable
{
	pub fn new(eps_radix:usize, num_tors:usize, num_servers_per_tor:Option<usize>) -> SparseReconfigurable
	{
		assert!(eps_radix%2==0,"the switch radix {} must be even, half access and half uplink",eps_radix);
		assert!(num_tors>1,"a mesh of {} ToR needs nobody to talk to",num_tors);
		SparseReconfigurable{
			eps_radix,
			num_pods: num_tors,
			num_servers_per_tor,
			adjacency: AdjacencyList::new(),
			device_id_to_pod_id: BTreeMap::new(),
		}
	}
}
