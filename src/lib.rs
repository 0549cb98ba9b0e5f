/*!
dcfabric-lib
=====

This crate generates datacenter fabric topologies: given the radix of the electrical
packet switches and a handful of sizing parameters it constructs the device multigraph,
the pod membership and the initial routing weight data of one of several fabric
designs, and renders them as the textual artifacts a downstream simulator
configuration loader consumes.

The available designs are

* [FatTree](topology::FatTree): the static three-tier baseline.
* [DenseReconfigurable](topology::DenseReconfigurable): pod-level reconfigurable, with
  a balanced-allocation-plus-min-cost-flow initial interpod topology.
* [SparseReconfigurable](topology::SparseReconfigurable): ToR-level reconfigurable,
  with a uniform logical full mesh at setup.
* [StaticExpander](topology::StaticExpander): ToR-only expander built by random graph
  lifts under a spectral acceptance test.

# Usage

This crate is `dcfabric-lib`. To use it add `dcfabric-lib` to your dependencies in
your project's `Cargo.toml`.

```toml
[dependencies]
dcfabric-lib = "0.1"
```

Then build a topology from its configuration record, wire it once and render the
artifacts. Construction is deterministic for every design but the expander, whose
random lifts draw from the `StdRng` given to `wire_network`.

```ignore
use std::collections::BTreeMap;
use rand::{rngs::StdRng,SeedableRng};
use dcfabric_lib::topology::{TopologyConfig,new_topology};

let mut rng = StdRng::seed_from_u64(42);
let config = TopologyConfig::DenseReconfigurable{
	eps_radix: 32,
	num_pods: 4,
	num_tors_per_pod: 4,
	oversubscription_ratio: (4,1),
};
let mut topology = new_topology(&config);
topology.wire_network(&mut rng)?;
std::fs::write("topology.txt",topology.topology_file_string())?;
std::fs::write("pod_ids.txt",topology.pod_id_file_string())?;
std::fs::write("routing_weights.txt",topology.interpod_routing_weights_string())?;
let traffic: BTreeMap<(usize,usize),f64> = some_traffic_probabilities();
std::fs::write("traffic.txt",topology.traffic_events_string(&traffic))?;
println!("generated {} with {} reconfigurable uplinks per pod",topology.name(),topology.num_reconfigurable_uplinks_per_pod());
```

The sizing invariants of each design, such as every pod having enough uplinks to reach
every other pod, are asserted at construction time. Writing the rendered strings to
files, as well as any power, cost or plotting analysis over them, is the business of
the caller; the crate itself performs no I/O.
*/

pub mod error;
pub mod quantify;
pub mod matrix;
pub mod flow;
pub mod topology;

pub use error::{Error,ErrorKind,SourceLocation};
pub use topology::{AdjacencyList,PhysicalTrafficMatrix,Topology,TopologyConfig,new_topology};
