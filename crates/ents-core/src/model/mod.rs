pub mod ent;
pub mod ent_id;

pub use ent::Ent;
pub use ent_id::EntId;
