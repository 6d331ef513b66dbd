//! Railway Simulation Library
//!
//! A railway-economy simulation core that runs headless; rendering and
//! persistence layers plug in from outside.

pub mod simulation;
