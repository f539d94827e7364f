// Application layer: wires config, storage and the cleaning engine into runnable flows.

pub mod batch;
pub mod pipelines;
