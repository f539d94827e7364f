pub mod notes_pipeline;
