
/*!

A Topology defines the devices of a datacenter fabric and the links between them.

Four designs are provided: the static [FatTree], the pod-level [DenseReconfigurable]
and ToR-level [SparseReconfigurable] reconfigurable fabrics, and the [StaticExpander]
built by random graph lifts. See [new_topology](fn.new_topology.html) for the
configuration record with which to build them.

All designs share the same lifecycle: build the value from its immutable sizing
parameters, call [wire_network](Topology::wire_network) exactly once, and then read
the serialization and query methods in any order.

*/

pub mod fattree;
pub mod sparse;
pub mod dense;
pub mod expander;

use std::collections::BTreeMap;
use std::fmt;

use ::rand::rngs::StdRng;
use itertools::Itertools;
use quantifiable_derive::Quantifiable;//the derive macro

use crate::error::Error;
use crate::quantify::Quantifiable;

pub use self::fattree::FatTree;
pub use self::sparse::SparseReconfigurable;
pub use self::dense::DenseReconfigurable;
pub use self::expander::StaticExpander;

///Relative traffic probability between ordered pairs of physical servers, as read from
///a traffic probability file. Probabilities need not be normalized.
pub type PhysicalTrafficMatrix = BTreeMap<(usize,usize),f64>;

/**
 The adjacency multigraph of a fabric: device to device to parallel-link count.
 Links are logically undirected; [add_link](Self::add_link) populates both directions,
 so `link_count(a,b)==link_count(b,a)` holds by construction. The reconfigurable
 transmit side of the dense design is the one place where a per-direction count is
 meaningful, through [add_directed_link](Self::add_directed_link).
**/
#[derive(Quantifiable)]
#[derive(Clone,Debug,Default)]
pub struct AdjacencyList
{
	links: BTreeMap<usize,BTreeMap<usize,usize>>,
}

impl AdjacencyList
{
	pub fn new() -> AdjacencyList
	{
		AdjacencyList::default()
	}
	///Declare a device, so that it counts towards `|V|` even while unlinked.
	pub fn add_device(&mut self, device:usize)
	{
		self.links.entry(device).or_default();
	}
	///Set the parallel-link count between two devices, in both directions.
	pub fn add_link(&mut self, first:usize, second:usize, link_count:usize)
	{
		self.links.entry(first).or_default().insert(second,link_count);
		self.links.entry(second).or_default().insert(first,link_count);
	}
	///Set the link count of the `source` to `target` direction alone.
	pub fn add_directed_link(&mut self, source:usize, target:usize, link_count:usize)
	{
		self.links.entry(source).or_default().insert(target,link_count);
	}
	///Parallel links from `source` towards `target`, 0 when the pair is not populated.
	pub fn link_count(&self, source:usize, target:usize) -> usize
	{
		self.links.get(&source).and_then(|neighbours|neighbours.get(&target)).copied().unwrap_or(0)
	}
	pub fn contains_device(&self, device:usize) -> bool
	{
		self.links.contains_key(&device)
	}
	pub fn num_devices(&self) -> usize
	{
		self.links.len()
	}
	///Device ids in ascending order.
	pub fn devices(&self) -> impl Iterator<Item=usize> + '_
	{
		self.links.keys().copied()
	}
	///The `(target,link_count)` pairs of a device, targets in ascending order.
	pub fn neighbours(&self, device:usize) -> impl Iterator<Item=(usize,usize)> + '_
	{
		self.links.get(&device).into_iter().flatten().map(|(&target,&link_count)|(target,link_count))
	}
	///Total outgoing parallel links of a device.
	pub fn degree(&self, device:usize) -> usize
	{
		self.neighbours(device).map(|(_target,link_count)|link_count).sum()
	}
	///Sum of link counts over every ordered pair. This is the `|E|` of the topology file.
	pub fn num_directed_links(&self) -> usize
	{
		self.links.values().map(|neighbours|neighbours.values().sum::<usize>()).sum()
	}
}

///How the header of the topology file designates the non-ToR switches.
#[derive(Clone,Debug)]
pub enum SwitchDescriptor
{
	///`incl_range(low,high)`, both ends included.
	InclusiveRange(usize,usize),
	///An explicit `set(...)` of device ids. May be empty.
	Explicit(Vec<usize>),
}

impl fmt::Display for SwitchDescriptor
{
	fn fmt(&self, formatter:&mut fmt::Formatter) -> fmt::Result
	{
		match self
		{
			SwitchDescriptor::InclusiveRange(low,high) => write!(formatter,"incl_range({},{})",low,high),
			SwitchDescriptor::Explicit(devices) => write!(formatter,"set({})",devices.iter().map(|device|device.to_string()).join(", ")),
		}
	}
}

/**
 A fabric design able to wire itself and render the four textual artifacts consumed by
 the downstream simulator configuration loader.
**/
pub trait Topology : Quantifiable + std::fmt::Debug
{
	/**
	 Populate the adjacency multigraph and the pod map from the sizing parameters.
	 Must run to completion before any serialization method is called; wiring an
	 instance twice is a caller error with unspecified result. Only the expander
	 uses the random number generator, and only the expander can fail.
	**/
	fn wire_network(&mut self, rng:&mut StdRng) -> Result<(),Error>;
	///The wired multigraph.
	fn adjacency(&self) -> &AdjacencyList;
	///Pod of every pod-scoped device. Devices absent from the map belong to no pod.
	fn device_pods(&self) -> &BTreeMap<usize,usize>;
	///The port count of every electrical packet switch of the fabric.
	fn eps_radix(&self) -> usize;
	fn num_pods(&self) -> usize;
	///The topology description: `|V|`, `|E|`, device ranges, then one line per unit of link capacity.
	fn topology_file_string(&self) -> String;
	///Device to pod CSV table, by ascending device id. Designs without pods return the empty string.
	fn pod_id_file_string(&self) -> String
	{
		format_pod_id_file(self.device_pods())
	}
	///The initial equal-split multi-path routing weights between pods. Empty for
	///designs with no interpod routing.
	fn interpod_routing_weights_string(&self) -> String
	{
		String::new()
	}
	/**
	 Re-map a physical-server traffic matrix to virtual server group granularity, drop
	 the pairs falling onto a single group, renormalize the rest to sum 1 and render
	 the indexed CSV table. Panics if the matrix references servers outside the fabric.
	**/
	fn traffic_events_string(&self, traffic:&PhysicalTrafficMatrix) -> String;
	///How many reconfigurable uplinks each pod drives. 0 for non-reconfigurable designs.
	fn num_reconfigurable_uplinks_per_pod(&self) -> usize
	{
		0
	}
	///Deterministic identifier encoding the radix and sizing parameters, used to label
	///the generated artifacts.
	fn name(&self) -> String;
}

///Render the topology file out of a wired multigraph and the device ranges of the
///concrete design. A multi-link pair of count `n` produces `n` duplicate lines.
pub fn format_topology_file(adjacency:&AdjacencyList, tor_range:(usize,usize), server_range:(usize,usize), switches:&SwitchDescriptor) -> String
{
	let mut edge_lines = String::new();
	for device in adjacency.devices()
	{
		for (target,link_count) in adjacency.neighbours(device)
		{
			for _ in 0..link_count
			{
				edge_lines += &format!("{} {}\n",device,target);
			}
		}
	}
	let mut header = String::new();
	header += &format!("|V|={}\n",adjacency.num_devices());
	header += &format!("|E|={}\n",adjacency.num_directed_links());
	header += &format!("ToRs=incl_range({},{})\n",tor_range.0,tor_range.1);
	header += &format!("Servers=incl_range({},{})\n",server_range.0,server_range.1);
	header += &format!("Switches={}\n\n",switches);
	header + &edge_lines
}

///Render the device to pod CSV table, device ids ascending.
pub fn format_pod_id_file(device_id_to_pod_id:&BTreeMap<usize,usize>) -> String
{
	let mut str_builder = String::new();
	for (device_id,pod_id) in device_id_to_pod_id
	{
		str_builder += &format!("{},{}\n",device_id,pod_id);
	}
	str_builder
}

/**
 Render the initial WCMP table of a uniform pod-to-pod logical topology: for every
 ordered pod pair one direct 2-hop path plus a 3-hop path through every other pod,
 all `num_pods-1` of them at equal weight.
**/
pub fn format_uniform_interpod_routing_weights(num_pods:usize) -> String
{
	let mut str_builder = String::new();
	let per_path_ratio = 1f64/(num_pods-1) as f64;
	for (src_pod,dst_pod) in (0..num_pods).cartesian_product(0..num_pods)
	{
		if src_pod!=dst_pod
		{
			str_builder += &format!("2,{:.6},{},{}\n",per_path_ratio,src_pod,dst_pod);
			for intermediate_pod in 0..num_pods
			{
				if intermediate_pod!=src_pod && intermediate_pod!=dst_pod
				{
					str_builder += &format!("3,{:.6},{},{},{}\n",per_path_ratio,src_pod,intermediate_pod,dst_pod);
				}
			}
		}
	}
	str_builder
}

/**
 Shared body of [Topology::traffic_events_string]. `virtual_servers_offset` is the id of
 the first virtual server group and `physical_servers_per_group` how many physical
 servers each group collapses. The probability mass is summed first and divided once.
**/
pub fn format_traffic_events(adjacency:&AdjacencyList, virtual_servers_offset:usize, physical_servers_per_group:usize, traffic:&PhysicalTrafficMatrix) -> String
{
	let mut probability_sum = 0f64;
	for (&(src,dst),&probability) in traffic
	{
		let src_virtual = virtual_servers_offset + src/physical_servers_per_group;
		let dst_virtual = virtual_servers_offset + dst/physical_servers_per_group;
		assert!(adjacency.contains_device(src_virtual) && adjacency.contains_device(dst_virtual),"traffic entry ({},{}) maps to virtual servers ({},{}) outside the fabric",src,dst,src_virtual,dst_virtual);
		if src_virtual!=dst_virtual
		{
			probability_sum += probability;
		}
	}
	let mut str_builder = String::new();
	let mut index = 0;
	for (&(src,dst),&probability) in traffic
	{
		let src_virtual = virtual_servers_offset + src/physical_servers_per_group;
		let dst_virtual = virtual_servers_offset + dst/physical_servers_per_group;
		if src_virtual!=dst_virtual
		{
			str_builder += &format!("{},{},{},{:.4e}\n",index,src_virtual,dst_virtual,probability/probability_sum);
			index += 1;
		}
	}
	str_builder
}

/**
 The static sizing parameters of one fabric design: an explicit immutable configuration
 record, passed whole to the corresponding constructor. No ambient state.
**/
#[derive(Clone,Debug)]
pub enum TopologyConfig
{
	FatTree{
		eps_radix: usize,
		num_pods: usize,
		num_tors_per_pod: usize,
		///`(access,uplink)` port ratio of the pod layer, e.g. `(4,1)`.
		oversubscription_ratio: (usize,usize),
	},
	SparseReconfigurable{
		eps_radix: usize,
		num_tors: usize,
		///Server-facing radix per ToR; half of it faces actual servers. Defaults to `eps_radix`.
		num_servers_per_tor: Option<usize>,
	},
	DenseReconfigurable{
		eps_radix: usize,
		num_pods: usize,
		num_tors_per_pod: usize,
		oversubscription_ratio: (usize,usize),
	},
	StaticExpander{
		eps_radix: usize,
		target_num_tors: usize,
		num_servers_per_tor: Option<usize>,
		///Bound on lift regenerations before the construction reports failure.
		maximum_lift_attempts: usize,
	},
}

/**
Build a topology from its configuration record.

```ignore
let config = TopologyConfig::DenseReconfigurable{
	eps_radix: 32,
	num_pods: 4,
	num_tors_per_pod: 4,
	oversubscription_ratio: (4,1),
};
let mut topology = new_topology(&config);
topology.wire_network(&mut rng)?;
let artifact = topology.topology_file_string();
```
**/
pub fn new_topology(config:&TopologyConfig) -> Box<dyn Topology>
{
	match config
	{
		&TopologyConfig::FatTree{ eps_radix, num_pods, num_tors_per_pod, oversubscription_ratio } =>
			Box::new(FatTree::new(eps_radix,num_pods,num_tors_per_pod,oversubscription_ratio)),
		&TopologyConfig::SparseReconfigurable{ eps_radix, num_tors, num_servers_per_tor } =>
			Box::new(SparseReconfigurable::new(eps_radix,num_tors,num_servers_per_tor)),
		&TopologyConfig::DenseReconfigurable{ eps_radix, num_pods, num_tors_per_pod, oversubscription_ratio } =>
			Box::new(DenseReconfigurable::new(eps_radix,num_pods,num_tors_per_pod,oversubscription_ratio)),
		&TopologyConfig::StaticExpander{ eps_radix, target_num_tors, num_servers_per_tor, maximum_lift_attempts } =>
			Box::new(StaticExpander::new(eps_radix,target_num_tors,num_servers_per_tor,maximum_lift_attempts)),
	}
}
