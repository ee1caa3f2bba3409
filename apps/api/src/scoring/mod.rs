// Big-Five scoring: rule table, intensity buckets, and the pure scoring engine.
// Nothing here performs I/O; answers come in, domains come out.

pub mod engine;
pub mod intensity;
pub mod rules;

pub use engine::{compute_domains, Domain, Subdomain};
pub use intensity::Intensity;
pub use rules::DomainKind;
