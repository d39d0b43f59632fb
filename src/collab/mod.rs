//! Contracts with the services around the compositor.
//!
//! Nothing here talks to a network or a database. [`generation`] defines the caption and
//! illustration provider interface, [`post`] the record shape handed to a post planner.

pub mod generation;
pub mod post;
