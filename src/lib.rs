//! Arena shooter simulation core.
//!
//! The crate is split the same way the terminal front-end consumes it:
//! plain data (`entities`, `geometry`, `timer`), per-entity behaviour
//! (`player`, `enemy`, `projectile`, `pickup`, `spawner`), and the `game`
//! aggregate that owns every entity list and drives the state machine.
//! Rendering, audio and persistence are reached only through the traits in
//! `assets`, `surface` and `save`.

pub mod assets;
pub mod config;
pub mod enemy;
pub mod entities;
pub mod error;
pub mod game;
pub mod geometry;
pub mod input;
pub mod pickup;
pub mod player;
pub mod projectile;
pub mod save;
pub mod spawner;
pub mod surface;
pub mod timer;
