//! `tps-collision` — the geometric oracle seam and the sampling that feeds it.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`predicate`] | `CollisionPredicate` trait                                 |
//! | [`adapters`]  | `NeverCollide`, `SphereClearance`, `FnPredicate`, `CountingPredicate` |
//! | [`sampling`]  | `sample_instants`, `sample_step`, `first_contact`          |
//!
//! The real swept-volume math (boxes, capsules, meshes) belongs to the
//! application.  The adapters here are enough for tests, demos, and cells
//! whose tools can be bounded by spheres.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | `first_contact` searches sample instants with Rayon.    |
//! | `serde`    | Derives on `Sphere`.                                    |

pub mod adapters;
pub mod predicate;
pub mod sampling;


pub use adapters::{CountingPredicate, FnPredicate, NeverCollide, Sphere, SphereClearance};
pub use predicate::CollisionPredicate;
pub use sampling::{SampleInstants, first_contact, sample_instants, sample_step};
