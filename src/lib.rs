//! Supply Chain Simulation Library
//!
//! A logistics management game core that runs headless on a virtual clock.

pub mod simulation;
