pub mod bugzilla;
pub mod identity;
pub mod koji;
pub mod process;
pub mod rpmspec;
pub mod scp;
