//! Runtime execution state: the definition cache, per-session state, and the
//! result value actions hand back to the interpreter.

mod cache;
mod result;
mod session;

pub use cache::{ModuleCache, ModuleCounts};
pub use result::{ActionResult, Outcome};
pub use session::{ExecutionFrame, ExecutionSession, PauseMarker};
