
/*!

The Error type returned by the fallible operations of the crate.

Violations of the sizing invariants are programmer/configuration errors and panic at
construction time instead of going through this type. The `Error` type is reserved for
outcomes a caller may want to handle, currently only the failure of the randomized
expander construction to pass its acceptance test within the attempt budget.

*/

use std::fmt;

///The point of the source code where an error was raised. Captured via the [source_location] macro.
#[derive(Debug)]
pub struct SourceLocation
{
	pub file: &'static str,
	pub line: u32,
}

impl fmt::Display for SourceLocation
{
	fn fmt(&self, formatter:&mut fmt::Formatter) -> fmt::Result
	{
		write!(formatter,"{}:{}",self.file,self.line)
	}
}

///Build the SourceLocation of the point where the macro is invoked.
#[macro_export]
macro_rules! source_location{
	() => {{
		$crate::error::SourceLocation{ file: file!(), line: line!() }
	}};
}

///The kinds of error that the crate may report.
#[derive(Debug)]
pub enum ErrorKind
{
	///The randomized expander construction exhausted its attempt budget without any lift
	///passing the spectral acceptance test.
	ExpanderDidNotConverge{ attempts: usize },
}

#[derive(Debug)]
pub struct Error
{
	pub source_location: SourceLocation,
	pub kind: ErrorKind,
	pub message: Option<String>,
}

impl Error
{
	pub fn new(source_location:SourceLocation, kind:ErrorKind) -> Error
	{
		Error{ source_location, kind, message: None }
	}
	///Attach a human-oriented explanation to the error.
	pub fn with_message(mut self, message:String) -> Error
	{
		self.message = Some(message);
		self
	}
	pub fn expander_did_not_converge(source_location:SourceLocation, attempts:usize) -> Error
	{
		Error::new(source_location,ErrorKind::ExpanderDidNotConverge{attempts})
	}
}

impl fmt::Display for Error
{
	fn fmt(&self, formatter:&mut fmt::Formatter) -> fmt::Result
	{
		write!(formatter,"{:?} at {}",self.kind,self.source_location)?;
		if let Some(ref message) = self.message
		{
			write!(formatter,": {}",message)?;
		}
		Ok(())
	}
}

///Build an Error of the kind given as first argument, capturing the source location.
///For example `error!(expander_did_not_converge,attempts)`.
#[macro_export]
macro_rules! error{
	($kind:ident $(,$arg:expr)* $(,)?) => {{
		$crate::error::Error::$kind($crate::source_location!() $(,$arg)*)
	}};
}
