use rand::rngs::StdRng;
use rand::SeedableRng;
use dcfabric_lib::topology::{new_topology, Topology, TopologyConfig};

///Build a topology from its configuration record and wire it with a seeded generator.
pub fn wired(config: &TopologyConfig, seed: u64) -> Box<dyn Topology>
{
    let mut rng = StdRng::seed_from_u64(seed);
    let mut topology = new_topology(config);
    topology.wire_network(&mut rng).expect("wiring should succeed");
    topology
}

///Check `link_count(a,b)==link_count(b,a)` over every populated pair.
pub fn assert_symmetric(topology: &dyn Topology)
{
    let adjacency = topology.adjacency();
    for device in adjacency.devices()
    {
        for (target, link_count) in adjacency.neighbours(device)
        {
            assert_eq!(adjacency.link_count(target, device), link_count,
                "asymmetric pair ({},{})", device, target);
        }
    }
}

pub fn small_fattree_config() -> TopologyConfig
{
    TopologyConfig::FatTree{
        eps_radix: 4,
        num_pods: 2,
        num_tors_per_pod: 2,
        oversubscription_ratio: (1,1),
    }
}

pub fn example_dense_config() -> TopologyConfig
{
    //16 uplinks per pod over 3 other pods: base 5 per pair with 1 leftover each.
    TopologyConfig::DenseReconfigurable{
        eps_radix: 32,
        num_pods: 4,
        num_tors_per_pod: 4,
        oversubscription_ratio: (4,1),
    }
}

pub fn example_sparse_config() -> TopologyConfig
{
    TopologyConfig::SparseReconfigurable{
        eps_radix: 64,
        num_tors: 8,
        num_servers_per_tor: None,
    }
}

pub fn small_expander_config() -> TopologyConfig
{
    //degree 4, lift factor 4: 20 ToRs for a requested 18.
    TopologyConfig::StaticExpander{
        eps_radix: 8,
        target_num_tors: 18,
        num_servers_per_tor: None,
        maximum_lift_attempts: 1000,
    }
}
