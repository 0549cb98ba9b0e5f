
/*!

Helpers to track the memory being employed.

*/

use std::mem::size_of;
use std::collections::BTreeMap;

///Trait to measure the memory usage of values.
pub trait Quantifiable
{
	///Get the total memory currently being employed by the implementing type. Both stack and heap.
	fn total_memory(&self) -> usize;
	///Prints by stdout how much memory is used per component.
	fn print_memory_breakdown(&self);
	///Get an estimation on how much memory the type could reach.
	fn forecast_total_memory(&self) -> usize;
}

macro_rules! quantify_plain
{
	($t:ty) => {
		impl Quantifiable for $t
		{
			fn total_memory(&self) -> usize
			{
				size_of::<$t>()
			}
			fn print_memory_breakdown(&self)
			{
				unimplemented!();
			}
			fn forecast_total_memory(&self) -> usize
			{
				size_of::<$t>()
			}
		}
	};
}

quantify_plain!(bool);
quantify_plain!(u8);
quantify_plain!(u32);
quantify_plain!(u64);
quantify_plain!(usize);
quantify_plain!(i64);
quantify_plain!(f32);
quantify_plain!(f64);

impl<T:Quantifiable> Quantifiable for Vec<T>
{
	fn total_memory(&self) -> usize
	{
		//Unused capacity is counted by its stack size alone.
		size_of::<Vec<T>>() + self.iter().map(|e|e.total_memory()).sum::<usize>() + (self.capacity()-self.len())*size_of::<T>()
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

impl<T:Quantifiable> Quantifiable for Option<T>
{
	fn total_memory(&self) -> usize
	{
		size_of::<Option<T>>() + match self
		{
			Some(value) => value.total_memory() - size_of::<T>(),
			None => 0,
		}
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

impl<A:Quantifiable,B:Quantifiable> Quantifiable for (A,B)
{
	fn total_memory(&self) -> usize
	{
		self.0.total_memory() + self.1.total_memory()
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

impl<K:Quantifiable,V:Quantifiable> Quantifiable for BTreeMap<K,V>
{
	fn total_memory(&self) -> usize
	{
		//We ignore the internal node structure of the tree.
		size_of::<BTreeMap<K,V>>() + self.iter().map(|(key,value)|key.total_memory()+value.total_memory()).sum::<usize>()
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

impl Quantifiable for String
{
	fn total_memory(&self) -> usize
	{
		size_of::<String>() + self.capacity()
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
