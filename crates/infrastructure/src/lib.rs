//! knife-dns infrastructure: the UDP query server, credential loading and
//! the inventory client.
pub mod dns;
pub mod inventory;
pub mod system;
