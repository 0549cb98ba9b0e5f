/*!
Tests of the wiring invariants of the four fabric designs.
 */

mod common;
use common::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use dcfabric_lib::ErrorKind;
use dcfabric_lib::matrix::Matrix;
use dcfabric_lib::topology::{FatTree, StaticExpander, Topology, TopologyConfig};

#[test]
fn fattree_wiring_test()
{
    let topology = wired(&small_fattree_config(), 1);
    let adjacency = topology.adjacency();
    //2 aggregation + 4 ToR + 4 server groups + 1 core.
    assert_eq!(adjacency.num_devices(), 11);
    assert_symmetric(topology.as_ref());
    //Uplinks per pod: 2 ToRs * 2 access links at ratio 1:1.
    assert_eq!(topology.num_reconfigurable_uplinks_per_pod(), 4);
    let core_switch_id = 10;
    for aggregation_id in 0..2
    {
        assert_eq!(adjacency.link_count(aggregation_id, core_switch_id), 4);
    }
    //Every ToR uses its full radix: half towards servers, half towards aggregation.
    for tor_id in 2..=5
    {
        assert_eq!(adjacency.degree(tor_id), topology.eps_radix());
    }
    //The core switch is not pod-scoped; everything else is.
    assert_eq!(topology.device_pods().len(), 10);
    assert!(!topology.device_pods().contains_key(&core_switch_id));
    assert_eq!(topology.device_pods()[&3], 0);
    assert_eq!(topology.device_pods()[&4], 1);
    assert_eq!(topology.name(), "fattree_eps4_np2_ntpp2_1to1");
}

#[test]
#[should_panic]
fn fattree_insufficient_uplinks_test()
{
    //A single ToR at 4:1 oversubscription leaves 0 uplinks for 7 other pods.
    FatTree::new(4, 8, 1, (4,1));
}

#[test]
fn dense_balanced_allocation_test()
{
    let topology = wired(&example_dense_config(), 1);
    let adjacency = topology.adjacency();
    let num_pods = topology.num_pods();
    assert_eq!(topology.num_reconfigurable_uplinks_per_pod(), 16);
    //Base allocation floor(16/3)=5 with leftover 1: every pair carries 5 or 6 links,
    //each pod drives exactly one extra link and receives exactly one.
    let mut extras_sent = vec![0; num_pods];
    let mut extras_received = vec![0; num_pods];
    for src_pod in 0..num_pods
    {
        let mut outgoing = 0;
        for dst_pod in 0..num_pods
        {
            if src_pod != dst_pod
            {
                let link_count = adjacency.link_count(src_pod, dst_pod);
                assert!(link_count == 5 || link_count == 6, "pair ({},{}) carries {} links", src_pod, dst_pod, link_count);
                outgoing += link_count;
                if link_count == 6
                {
                    extras_sent[src_pod] += 1;
                    extras_received[dst_pod] += 1;
                }
            }
        }
        assert_eq!(outgoing, 16, "pod {} drives {} uplinks instead of its budget", src_pod, outgoing);
    }
    for pod in 0..num_pods
    {
        assert_eq!(extras_sent[pod], 1);
        assert_eq!(extras_received[pod], 1);
    }
    //The pod-internal layers are plain cables and symmetric.
    for tor_id in num_pods..num_pods*(1+4)
    {
        assert_eq!(adjacency.degree(tor_id), topology.eps_radix());
        let pod_id = topology.device_pods()[&tor_id];
        assert_eq!(adjacency.link_count(tor_id, pod_id), adjacency.link_count(pod_id, tor_id));
    }
    assert_eq!(topology.name(), "pod_eps32_np4_ntpp4_4to1");
}

#[test]
fn dense_even_allocation_test()
{
    //12 uplinks over 3 other pods divide evenly: no leftover, fully symmetric fabric.
    let config = TopologyConfig::DenseReconfigurable{
        eps_radix: 8,
        num_pods: 4,
        num_tors_per_pod: 3,
        oversubscription_ratio: (1,1),
    };
    let topology = wired(&config, 1);
    assert_symmetric(topology.as_ref());
    let adjacency = topology.adjacency();
    for src_pod in 0..4
    {
        for dst_pod in 0..4
        {
            if src_pod != dst_pod
            {
                assert_eq!(adjacency.link_count(src_pod, dst_pod), 4);
            }
        }
    }
}

#[test]
fn dense_odd_pods_leftover_test()
{
    //5 pods with 9 uplinks each: base floor(9/4)=2 with leftover 1, an odd total of
    //extras that no symmetric placement could carry. The flow must still hand every
    //pod exactly one extra link sent and one received, within its budget of 9.
    let config = TopologyConfig::DenseReconfigurable{
        eps_radix: 6,
        num_pods: 5,
        num_tors_per_pod: 3,
        oversubscription_ratio: (1,1),
    };
    let topology = wired(&config, 3);
    let adjacency = topology.adjacency();
    let mut extras_received = vec![0; 5];
    for src_pod in 0..5
    {
        let mut outgoing = 0;
        let mut extras_sent = 0;
        for dst_pod in 0..5
        {
            if src_pod != dst_pod
            {
                let link_count = adjacency.link_count(src_pod, dst_pod);
                assert!(link_count == 2 || link_count == 3, "pair ({},{}) carries {} links", src_pod, dst_pod, link_count);
                outgoing += link_count;
                if link_count == 3
                {
                    extras_sent += 1;
                    extras_received[dst_pod] += 1;
                }
            }
        }
        assert_eq!(outgoing, 9, "pod {} drives {} uplinks instead of its budget", src_pod, outgoing);
        assert_eq!(extras_sent, 1);
    }
    for pod in 0..5
    {
        assert_eq!(extras_received[pod], 1);
    }
}

#[test]
fn sparse_uniform_mesh_test()
{
    let topology = wired(&example_sparse_config(), 1);
    let adjacency = topology.adjacency();
    let num_pods = topology.num_pods();
    assert_eq!(num_pods, 8);
    assert_symmetric(topology.as_ref());
    for i in 0..num_pods
    {
        for j in 0..num_pods
        {
            assert_eq!(adjacency.link_count(i, j), if i==j {0} else {1});
        }
        //The ToR's physical ports: half to its server group, half driving the
        //reconfigurable uplinks the mesh time-shares.
        assert_eq!(adjacency.link_count(i, num_pods+i) + topology.num_reconfigurable_uplinks_per_pod(), topology.eps_radix());
    }
    assert_eq!(topology.num_reconfigurable_uplinks_per_pod(), 32);
    assert_eq!(topology.name(), "tor_eps64_np8");
}

#[test]
fn expander_lift_test()
{
    let topology = wired(&small_expander_config(), 7);
    let adjacency = topology.adjacency();
    //The lift rounds the 18 requested ToRs up to (4+1)*4.
    let num_tors = topology.num_pods();
    assert_eq!(num_tors, 20);
    assert_symmetric(topology.as_ref());
    let degree = topology.eps_radix()/2;
    for tor_id in 0..num_tors
    {
        //Exactly d links to other ToRs plus d to the server group.
        assert_eq!(adjacency.degree(tor_id), topology.eps_radix());
        assert_eq!(adjacency.link_count(tor_id, num_tors+tor_id), degree);
    }
    //The accepted graph must beat the Ramanujan bound.
    let mut matrix = Matrix::constant(0usize, num_tors, num_tors);
    for i in 0..num_tors
    {
        for j in 0..num_tors
        {
            *matrix.get_mut(i, j) = if i==j {0} else {adjacency.link_count(i, j)};
        }
    }
    assert!(StaticExpander::second_eigenvalue_magnitude(&matrix) < StaticExpander::spectral_bound(degree));
    assert_eq!(topology.num_reconfigurable_uplinks_per_pod(), 0);
    assert_eq!(topology.name(), "expander_eps8_np20");
}

#[test]
fn expander_attempt_exhaustion_test()
{
    //Every 2-lift of K3 is a 2-regular graph on 6 nodes, a union of cycles: a single
    //6-cycle is bipartite with an eigenvalue at -2, and anything disconnected has a
    //second eigenvalue at 2. Against the strict bound 2*sqrt(1)=2 no lift can ever be
    //accepted, so the construction must give up after the configured attempts.
    let mut topology = StaticExpander::new(4, 4, None, 5);
    let mut rng = StdRng::seed_from_u64(1);
    let err = topology.wire_network(&mut rng).expect_err("no 2-lift of K3 passes the spectral test");
    match err.kind
    {
        ErrorKind::ExpanderDidNotConverge{attempts} => assert_eq!(attempts, 5),
    }
}

#[test]
fn spectral_bound_is_strict_test()
{
    //C4 is 2-regular with second eigenvalue magnitude exactly at the bound 2*sqrt(1):
    //being at the bound is not under it.
    let n = 4;
    let mut cycle = Matrix::constant(0usize, n, n);
    for i in 0..n
    {
        *cycle.get_mut(i, (i+1)%n) = 1;
        *cycle.get_mut((i+1)%n, i) = 1;
    }
    let magnitude = StaticExpander::second_eigenvalue_magnitude(&cycle);
    assert!((magnitude - StaticExpander::spectral_bound(2)).abs() < 1e-8);
    assert!(!(magnitude < StaticExpander::spectral_bound(2)));
}
