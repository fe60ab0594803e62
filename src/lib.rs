pub mod cigar;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod filter;
pub mod parse;
pub mod process;
pub mod record;
pub mod utils;

use tikv_jemallocator::Jemalloc;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;
