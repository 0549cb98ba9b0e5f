
use std::collections::BTreeMap;

use ::rand::rngs::StdRng;
use itertools::Itertools;
use quantifiable_derive::Quantifiable;//the derive macro

use crate::error::Error;
use crate::flow::FlowNetwork;
use crate::matrix::Matrix;
use crate::topology::{AdjacencyList,PhysicalTrafficMatrix,SwitchDescriptor,Topology,format_topology_file,format_traffic_events,format_uniform_interpod_routing_weights};

/**
The pod-level reconfigurable fabric. Each pod is a two-layer full-bisection block: a
ToR layer of `num_tors_per_pod` switches and an aggregation layer logically collapsed
into a single switch, each ToR on `eps_radix/2` parallel links to it and one virtual
server group per ToR on another `eps_radix/2`.

Each pod drives `num_reconfigurable_uplinks_per_pod` uplinks through the
reconfigurable interconnect,

```text
num_tors_per_pod * (eps_radix/2) * oversubscription_denominator/oversubscription_numerator
```

and the initial interpod logical topology spreads them as evenly as possible over the
other `num_pods-1` pods: a floor division gives every ordered pod pair the same base
link count, and the per-pod leftover is placed by a min-cost maximum flow that sends
each pod's leftover units to that many distinct other pods. A greedy placement could
starve or double-assign a target pod; the flow cannot, since the pair arcs have unit
capacity and the slot arcs bound every pod's total at exactly the leftover.

Device id layout as in [FatTree](crate::topology::FatTree) minus the core switch:
aggregation switch of pod `p` is `p`, then ToRs, then server groups.

Uplinks model the transmit side of each pod, so the interpod link counts are kept per
direction: when the leftover is nonzero its placement need not be symmetric (there is
no 1-regular graph on an odd number of pods), and only the per-direction counts
preserve the exact per-pod uplink budget.
**/
#[derive(Quantifiable)]
#[derive(Debug)]
pub struct DenseReconfigurable
{
	eps_radix: usize,
	num_pods: usize,
	num_tors_per_pod: usize,
	oversubscription_ratio: (usize,usize),
	num_reconfigurable_uplinks_per_pod: usize,
	adjacency: AdjacencyList,
	device_id_to_pod_id: BTreeMap<usize,usize>,
}

impl Topology for DenseReconfigurable
{
	fn wire_network(&mut self, _rng:&mut StdRng) -> Result<(),Error>
	{
		for pod_id in 0..self.num_pods
		{
			let aggregation_id = pod_id;
			self.adjacency.add_device(aggregation_id);
			self.device_id_to_pod_id.insert(aggregation_id,pod_id);
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
		let interpod = self.uniform_interpod_connectivity();
		for (src_pod,dst_pod) in (0..self.num_pods).cartesian_product(0..self.num_pods)
		{
			if src_pod!=dst_pod
			{
				self.adjacency.add_directed_link(src_pod,dst_pod,*interpod.get(src_pod,dst_pod));
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
		let tor_range = (self.num_pods, self.num_pods*(1+self.num_tors_per_pod)-1);
		let server_range = (self.num_pods*(1+self.num_tors_per_pod), self.num_pods*(1+2*self.num_tors_per_pod)-1);
		format_topology_file(&self.adjacency,tor_range,server_range,&SwitchDescriptor::InclusiveRange(0,self.num_pods-1))
	}
	fn interpod_routing_weights_string(&self) -> String
	{
		format_uniform_interpod_routing_weights(self.num_pods)
	}
	fn traffic_events_string(&self, traffic:&PhysicalTrafficMatrix) -> String
	{
		let virtual_servers_offset = self.num_pods*(1+self.num_tors_per_pod);
		format_traffic_events(&self.adjacency,virtual_servers_offset,self.eps_radix/2,traffic)
	}
	fn num_reconfigurable_uplinks_per_pod(&self) -> usize
	{
		self.num_reconfigurable_uplinks_per_pod
	}
	fn name(&self) -> String
	{
		format!("pod_eps{}_np{}_ntpp{}_{}to{}",self.eps_radix,self.num_pods,self.num_tors_per_pod,self.oversubscription_ratio.0,self.oversubscription_ratio.1)
	}
}

impl DenseReconfigurable
{
	pub fn new(eps_radix:usize, num_pods:usize, num_tors_per_pod:usize, oversubscription_ratio:(usize,usize)) -> DenseReconfigurable
	{
		assert!(eps_radix%2==0,"the switch radix {} must be even, half access and half uplink",eps_radix);
		assert!(num_pods>1,"an interpod fabric needs at least 2 pods, got {}",num_pods);
		assert!(oversubscription_ratio.0>0 && oversubscription_ratio.1>0,"degenerate oversubscription ratio {}:{}",oversubscription_ratio.0,oversubscription_ratio.1);
		let num_reconfigurable_uplinks_per_pod = num_tors_per_pod*(eps_radix/2)*oversubscription_ratio.1/oversubscription_ratio.0;
		assert!(num_reconfigurable_uplinks_per_pod > num_pods-1,"{} uplinks per pod cannot reach the other {} pods",num_reconfigurable_uplinks_per_pod,num_pods-1);
		DenseReconfigurable{
			eps_radix,
			num_pods,
			num_tors_per_pod,
			oversubscription_ratio,
			num_reconfigurable_uplinks_per_pod,
			adjacency: AdjacencyList::new(),
			device_id_to_pod_id: BTreeMap::new(),
		}
	}
	/**
	 The initial uniform interpod logical topology: entry `(i,j)` is the number of
	 links pod `i` drives towards pod `j`. Base floor allocation plus the flow-placed
	 leftover; every row sums to exactly `num_reconfigurable_uplinks_per_pod`.
	**/
	fn uniform_interpod_connectivity(&self) -> Matrix<usize>
	{
		let num_pods = self.num_pods;
		let per_pod_pair_links = self.num_reconfigurable_uplinks_per_pod/(num_pods-1);
		let mut interpod = Matrix::constant(per_pod_pair_links,num_pods,num_pods);
		for pod in 0..num_pods
		{
			*interpod.get_mut(pod,pod) = 0;
		}
		let leftover = self.num_reconfigurable_uplinks_per_pod - per_pod_pair_links*(num_pods-1);
		//By the floor division, 0 <= leftover < num_pods-1.
		if leftover>0
		{
			//One outgoing slot node and one incoming slot node per pod. The unit arcs
			//between different pods carry unit cost so that the maximum flow, num_pods
			//times the leftover, is reached on exactly that many distinct pairs.
			let source = 0;
			let sink = 2*num_pods+1;
			let mut network = FlowNetwork::new(2*num_pods+2);
			for pod in 0..num_pods
			{
				network.add_arc(source,1+pod,leftover,0);
				network.add_arc(1+num_pods+pod,sink,leftover,0);
			}
			let mut pair_arcs = Vec::with_capacity(num_pods*(num_pods-1));
			for (i,j) in (0..num_pods).cartesian_product(0..num_pods)
			{
				if i!=j
				{
					pair_arcs.push((i,j,network.add_arc(1+i,1+num_pods+j,1,1)));
				}
			}
			let (total_flow,_total_cost) = network.max_flow_min_cost(source,sink);
			assert_eq!(total_flow,num_pods*leftover,"the leftover balancing flow saturated only {} of {} units",total_flow,num_pods*leftover);
			for (i,j,arc_index) in pair_arcs
			{
				*interpod.get_mut(i,j) += network.flow(arc_index);
			}
		}
		interpod
	}
}
