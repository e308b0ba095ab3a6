//! Toolchain discovery and selection.
//!
//! Discovery runs three probes (GNU, Clang, MSVC) concurrently, reports the
//! first usable result as soon as one arrives, and picks a final toolchain
//! once all have finished:
//!
//! 1. A family with a C++ compiler and a debugger, in priority order
//!    GNU > Clang > MSVC
//! 2. A combo assembled field by field from all families
//! 3. The embedded toolchain bundled with the application
//!
//! Nothing in this module returns an error; missing tools are absent fields.

mod coordinator;
mod embedded;
mod lookup;
mod probe;
mod selection;

pub use coordinator::{DiscoveryCoordinator, DiscoverySnapshot};
pub use embedded::{EmbeddedResolver, DEFAULT_BUNDLE_DIR};
pub use lookup::{CommandLookup, ExecutableLookup, LookupMethod, PathLookup};
pub use probe::probe;
pub use selection::{assemble_combo, first_in_priority, select};
