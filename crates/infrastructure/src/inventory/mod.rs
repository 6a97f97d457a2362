pub mod chef_server;

pub use chef_server::ChefServerInventory;
