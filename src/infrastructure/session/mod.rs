mod memory;

pub use memory::InMemorySessionStore;
