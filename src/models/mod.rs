pub mod commit;
pub mod graph;
