pub mod environment;
pub mod knife_file;

pub use environment::ProcessEnvironment;
pub use knife_file::KnifeFileLoader;
