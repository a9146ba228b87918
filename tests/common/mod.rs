#![allow(dead_code)]

use practice_scheduler::{PracticeDomain, SchedulerOptions};
use tracing_subscriber::EnvFilter;

pub const SEED: u64 = 20260101;

/// Install a test subscriber once; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

/// Seeded domain holding `names`, all active and not required
pub fn domain_with(names: &[&str]) -> PracticeDomain {
    init_tracing();
    let mut domain = PracticeDomain::with_options(SchedulerOptions::with_seed(SEED));
    for name in names {
        domain.add_item(*name).unwrap();
    }
    domain
}
