
use std::collections::BTreeMap;

use ::rand::rngs::StdRng;
use ::rand::prelude::SliceRandom;
use itertools::Itertools;
use quantifiable_derive::Quantifiable;//the derive macro

use crate::error;
use crate::error::Error;
use crate::matrix::Matrix;
use crate::topology::{AdjacencyList,PhysicalTrafficMatrix,SwitchDescriptor,Topology,format_topology_file,format_traffic_events};

/**
A static expander connecting ToRs directly, with no intermediate layer and no pods.
Built by random k-lifting in the style of Xpander: starting from the complete graph on
`d+1` nodes, `d = eps_radix/2`, every base edge is replaced by a random perfect
matching between the `k` copies of its endpoints, giving a `d`-regular graph on
`(d+1)*k` ToRs with `k` the least lift reaching `target_num_tors`. One virtual server
group hangs from each ToR on `eps_radix/2` links.

A lift is accepted only if the second largest eigenvalue magnitude of its adjacency
matrix stays strictly under the Ramanujan bound `2*sqrt(d-1)`; otherwise it is
regenerated from scratch. Random lifts pass the test with high probability, but the
number of regenerations is bounded by `maximum_lift_attempts` and exhausting the
budget is reported as an [Error] rather than looping forever.

After wiring, `num_pods` holds the realized ToR count `(d+1)*k`, which may exceed the
requested target. There is no pod structure: the pod-id and routing-weight outputs are
both empty.
**/
#[derive(Quantifiable)]
#[derive(Debug)]
pub struct StaticExpander
{
	eps_radix: usize,
	///Requested at construction, then overwritten by the realized lift size on wiring.
	num_pods: usize,
	///Server-facing radix per ToR; the group stands for half as many physical servers.
	///`None` defaults to `eps_radix`.
	num_servers_per_tor: Option<usize>,
	maximum_lift_attempts: usize,
	adjacency: AdjacencyList,
	///Always empty: no device of this design is pod-scoped.
	device_id_to_pod_id: BTreeMap<usize,usize>,
}

impl Topology for StaticExpander
{
	fn wire_network(&mut self, rng:&mut StdRng) -> Result<(),Error>
	{
		let degree = self.eps_radix/2;
		let lift_factor = (self.num_pods+degree)/(degree+1);//ceil(target/(d+1))
		let tor_matrix = self.random_k_lift(degree,lift_factor,rng)?;
		self.num_pods = tor_matrix.get_rows();
		for tor_id in 0..self.num_pods
		{
			let server_id = self.num_pods + tor_id;
			self.adjacency.add_device(tor_id);
			self.adjacency.add_device(server_id);
			self.adjacency.add_link(server_id,tor_id,self.eps_radix/2);
		}
		for i in 0..self.num_pods
		{
			for j in i+1..self.num_pods
			{
				let link_count = *tor_matrix.get(i,j);
				if link_count>0
				{
					self.adjacency.add_link(i,j,link_count);
				}
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
	fn pod_id_file_string(&self) -> String
	{
		String::new()
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
	fn name(&self) -> String
	{
		format!("expander_eps{}_np{}",self.eps_radix,self.num_pods)
	}
}

impl StaticExpander
{
	pub fn new(eps_radix:usize, target_num_tors:usize, num_servers_per_tor:Option<usize>, maximum_lift_attempts:usize) -> StaticExpander
	{
		assert!(eps_radix%2==0,"the switch radix {} must be even, half access and half uplink",eps_radix);
		assert!(eps_radix/2 < target_num_tors-1,"an expander over {} ToRs of degree {} would just be a complete graph",target_num_tors,eps_radix/2);
		assert!(maximum_lift_attempts>0,"at least one lift attempt is required");
		StaticExpander{
			eps_radix,
			num_pods: target_num_tors,
			num_servers_per_tor,
			maximum_lift_attempts,
			adjacency: AdjacencyList::new(),
			device_id_to_pod_id: BTreeMap::new(),
		}
	}
	/**
	 Perform random `lift_factor`-lifts of the complete graph on `degree+1` nodes until
	 one passes the spectral acceptance test, up to `maximum_lift_attempts` of them.
	 Returns the adjacency matrix of the accepted `degree`-regular graph, symmetric by
	 construction.
	**/
	fn random_k_lift(&self, degree:usize, lift_factor:usize, rng:&mut StdRng) -> Result<Matrix<usize>,Error>
	{
		let num_nodes = (degree+1)*lift_factor;
		for _attempt in 0..self.maximum_lift_attempts
		{
			let mut matrix = Matrix::constant(0,num_nodes,num_nodes);
			for (meta1,meta2) in (0..degree+1).tuple_combinations()
			{
				//Replace the base edge by a random perfect matching between the copies.
				let mut matching: Vec<usize> = (0..lift_factor).collect();
				matching.shuffle(rng);
				for src_index in 0..lift_factor
				{
					let src = meta1*lift_factor + src_index;
					let dst = meta2*lift_factor + matching[src_index];
					*matrix.get_mut(src,dst) = 1;
					*matrix.get_mut(dst,src) = 1;
				}
			}
			if Self::is_ramanujan(&matrix,degree)
			{
				return Ok(matrix);
			}
		}
		Err(error!(expander_did_not_converge,self.maximum_lift_attempts).with_message(format!("no {}-lift of the complete graph on {} nodes passed the spectral test",lift_factor,degree+1)))
	}
	///The magnitude of the second largest (by magnitude) adjacency eigenvalue.
	pub fn second_eigenvalue_magnitude(matrix:&Matrix<usize>) -> f64
	{
		let mut eigenvalues = matrix.map(|&entry|entry as f64).symmetric_eigenvalues();
		eigenvalues.sort_by(|a,b|a.abs().partial_cmp(&b.abs()).expect("an adjacency eigenvalue is NaN"));
		eigenvalues[eigenvalues.len()-2].abs()
	}
	///The Ramanujan bound `2*sqrt(degree-1)` on the nontrivial spectrum.
	pub fn spectral_bound(degree:usize) -> f64
	{
		2f64*((degree-1) as f64).sqrt()
	}
	fn is_ramanujan(matrix:&Matrix<usize>, degree:usize) -> bool
	{
		Self::second_eigenvalue_magnitude(matrix) < Self::spectral_bound(degree)
	}
}
