pub mod attachment;
pub mod items;
