pub mod listing_writer;
pub mod mutation_reader;
