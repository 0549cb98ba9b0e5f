
use std::mem::{size_of};
use crate::quantify::Quantifiable;

///A simple matrix struct. Used for the interpod allocation table and for the adjacency
///matrix of the expander lift, including its eigenvalue computation.
#[derive(Clone,Debug)]
pub struct Matrix<T>
{
	data: Vec<T>,
	num_columns: usize,
}

impl<T> Matrix<T>
{
	///Read a matrix entry.
	pub fn get(&self,row:usize,column:usize) -> &T
	{
		&self.data[row*self.num_columns+column]
	}
	///Read/write a matrix entry.
	pub fn get_mut(&mut self,row:usize,column:usize) -> &mut T
	{
		&mut self.data[row*self.num_columns+column]
	}
	///Get the number of rows
	pub fn get_rows(&self) -> usize
	{
		self.data.len()/self.num_columns
	}
	///Get the number of columns
	pub fn get_columns(&self) -> usize
	{
		self.num_columns
	}
	///Build a matrix with constant values.
	pub fn constant(value:T,num_rows:usize,num_columns:usize) -> Matrix<T> where T:Clone
	{
		Matrix{
			data: vec![value;num_rows*num_columns],
			num_columns,
		}
	}
	pub fn map<U,F:FnMut(&T)->U>(&self, f:F) -> Matrix<U>
	{
		Matrix{
			data: self.data.iter().map(f).collect(),
			num_columns: self.num_columns,
		}
	}
}

impl Matrix<f64>
{
	/**
	 Eigenvalues of a symmetric matrix, computed by cyclic Jacobi rotations.
	 The entries above the diagonal are annihilated in sweeps until the off-diagonal
	 Frobenius norm falls under tolerance. Returns the diagonal, in no particular order.
	 Panics if the matrix is not square. The symmetry of the input is not checked.
	**/
	pub fn symmetric_eigenvalues(&self) -> Vec<f64>
	{
		let n = self.get_rows();
		assert_eq!(n,self.get_columns(),"eigenvalues of a non-square {}x{} matrix",n,self.get_columns());
		if n==0
		{
			return vec![];
		}
		let mut working = self.clone();
		let tolerance = 1e-10;
		//Jacobi converges quadratically; a handful of sweeps suffices in practice.
		for _sweep in 0..100
		{
			let mut off_norm = 0f64;
			for row in 0..n
			{
				for column in row+1..n
				{
					off_norm += working.get(row,column)*working.get(row,column);
				}
			}
			if off_norm.sqrt() <= tolerance
			{
				break;
			}
			for p in 0..n
			{
				for q in p+1..n
				{
					let apq = *working.get(p,q);
					if apq.abs() <= tolerance/(n*n) as f64
					{
						continue;
					}
					//Rotation angle annihilating the (p,q) entry; the stable root of t^2+2*tau*t-1.
					let tau = (working.get(q,q) - working.get(p,p)) / (2f64*apq);
					let t = if tau>=0f64 { 1f64/(tau+(1f64+tau*tau).sqrt()) } else { -1f64/(-tau+(1f64+tau*tau).sqrt()) };
					let c = 1f64/(1f64+t*t).sqrt();
					let s = t*c;
					for k in 0..n
					{
						let akp = *working.get(k,p);
						let akq = *working.get(k,q);
						*working.get_mut(k,p) = c*akp - s*akq;
						*working.get_mut(k,q) = s*akp + c*akq;
					}
					for k in 0..n
					{
						let apk = *working.get(p,k);
						let aqk = *working.get(q,k);
						*working.get_mut(p,k) = c*apk - s*aqk;
						*working.get_mut(q,k) = s*apk + c*aqk;
					}
				}
			}
		}
		(0..n).map(|index|*working.get(index,index)).collect()
	}
}

impl<T:Quantifiable> Quantifiable for Matrix<T>
{
	fn total_memory(&self) -> usize
	{
		size_of::<Matrix<T>>() + self.data.total_memory()
	}
	fn print_memory_breakdown(&self)
	{
		unimplemented!();
	}
	fn forecast_total_memory(&self) -> usize
	{
		unimplemented!();
	}
}
