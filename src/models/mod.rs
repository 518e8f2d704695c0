// src/models/mod.rs

pub mod participant;
pub mod question;
pub mod settings;
