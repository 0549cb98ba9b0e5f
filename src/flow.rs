
/*!

A small min-cost maximum-flow solver over explicit networks.

Used to balance the leftover interpod links of the dense reconfigurable fabric: the
networks involved have about twice as many nodes as pods, so a successive shortest
augmenting path scheme with Bellman--Ford searches is entirely sufficient.

*/

///A directed arc together with its remaining capacity. Arcs are stored in pairs, the
///arc at an even index and its residual companion right after it.
#[derive(Debug)]
struct Arc
{
	to: usize,
	capacity: usize,
	cost: i64,
}

///A flow network over nodes indexed `0..num_nodes`.
#[derive(Debug)]
pub struct FlowNetwork
{
	arcs: Vec<Arc>,
	///For each node, the indices into `arcs` of its outgoing arcs, residual ones included.
	outgoing: Vec<Vec<usize>>,
}

impl FlowNetwork
{
	pub fn new(num_nodes:usize) -> FlowNetwork
	{
		FlowNetwork{
			arcs: vec![],
			outgoing: vec![vec![];num_nodes],
		}
	}
	///Add an arc from `from` to `to`. Returns an index with which to query its flow
	///after running [max_flow_min_cost](Self::max_flow_min_cost).
	pub fn add_arc(&mut self, from:usize, to:usize, capacity:usize, cost:i64) -> usize
	{
		let index = self.arcs.len();
		self.arcs.push(Arc{ to, capacity, cost });
		self.outgoing[from].push(index);
		self.arcs.push(Arc{ to:from, capacity:0, cost:-cost });
		self.outgoing[to].push(index+1);
		index
	}
	///The flow currently assigned to the arc `arc_index`, as returned by [add_arc](Self::add_arc).
	pub fn flow(&self, arc_index:usize) -> usize
	{
		//The residual companion accumulates exactly the pushed flow.
		self.arcs[arc_index^1].capacity
	}
	/**
	 Compute a maximum flow of minimum cost from `source` to `sink` by repeatedly
	 augmenting along a cheapest residual path. Returns the total flow and its cost.
	 Costs may be zero but the initial arcs must not have negative cost.
	**/
	pub fn max_flow_min_cost(&mut self, source:usize, sink:usize) -> (usize,i64)
	{
		let num_nodes = self.outgoing.len();
		let mut total_flow = 0;
		let mut total_cost = 0;
		loop
		{
			//Bellman--Ford from the source over arcs with remaining capacity.
			let mut distance = vec![i64::MAX;num_nodes];
			let mut reached_through: Vec<Option<usize>> = vec![None;num_nodes];
			distance[source] = 0;
			for _round in 0..num_nodes
			{
				let mut improved = false;
				for node in 0..num_nodes
				{
					if distance[node]==i64::MAX
					{
						continue;
					}
					for &arc_index in self.outgoing[node].iter()
					{
						let arc = &self.arcs[arc_index];
						if arc.capacity>0 && distance[node]+arc.cost < distance[arc.to]
						{
							distance[arc.to] = distance[node]+arc.cost;
							reached_through[arc.to] = Some(arc_index);
							improved = true;
						}
					}
				}
				if !improved
				{
					break;
				}
			}
			if distance[sink]==i64::MAX
			{
				break;
			}
			//Bottleneck along the found path.
			let mut bottleneck = usize::MAX;
			let mut node = sink;
			while node!=source
			{
				let arc_index = reached_through[node].expect("the path must reach back to the source");
				bottleneck = bottleneck.min(self.arcs[arc_index].capacity);
				node = self.arcs[arc_index^1].to;
			}
			//And augment.
			let mut node = sink;
			while node!=source
			{
				let arc_index = reached_through[node].expect("the path must reach back to the source");
				self.arcs[arc_index].capacity -= bottleneck;
				self.arcs[arc_index^1].capacity += bottleneck;
				node = self.arcs[arc_index^1].to;
			}
			total_flow += bottleneck;
			total_cost += distance[sink]*(bottleneck as i64);
		}
		(total_flow,total_cost)
	}
}


#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn saturates_unit_bipartite_assignment()
	{
		//The leftover structure for 3 pods with 1 leftover link each: a perfect
		//assignment avoiding the diagonal must be found.
		let num_pods = 3;
		let leftover = 1;
		let source = 0;
		let sink = 2*num_pods+1;
		let mut network = FlowNetwork::new(2*num_pods+2);
		for i in 0..num_pods
		{
			network.add_arc(source,1+i,leftover,0);
			network.add_arc(1+num_pods+i,sink,leftover,0);
		}
		let mut pair_arcs = vec![];
		for i in 0..num_pods
		{
			for j in 0..num_pods
			{
				if i!=j
				{
					pair_arcs.push((i,j,network.add_arc(1+i,1+num_pods+j,1,1)));
				}
			}
		}
		let (flow,cost) = network.max_flow_min_cost(source,sink);
		assert_eq!(flow,num_pods*leftover);
		assert_eq!(cost,(num_pods*leftover) as i64);
		let mut sent = vec![0;num_pods];
		let mut received = vec![0;num_pods];
		for &(i,j,arc_index) in pair_arcs.iter()
		{
			let flow = network.flow(arc_index);
			assert!(flow<=1);
			assert!(i!=j || flow==0);
			sent[i] += flow;
			received[j] += flow;
		}
		for i in 0..num_pods
		{
			assert_eq!(sent[i],leftover);
			assert_eq!(received[i],leftover);
		}
	}

	#[test]
	fn respects_capacities()
	{
		//source -> 1 -> sink with a cheap bounded arc and an expensive wide one in parallel.
		let mut network = FlowNetwork::new(3);
		let cheap = network.add_arc(0,1,2,1);
		let expensive = network.add_arc(0,1,10,5);
		network.add_arc(1,2,5,0);
		let (flow,cost) = network.max_flow_min_cost(0,2);
		assert_eq!(flow,5);
		assert_eq!(network.flow(cheap),2);
		assert_eq!(network.flow(expensive),3);
		assert_eq!(cost,2*1+3*5);
	}
}
