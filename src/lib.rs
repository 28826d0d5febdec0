//! Pet Connect backend: adoption listings, lost/found reports and the FAQ chat widget.

// Interdiction stricte de pratiques dangereuses ou non idiomatiques
#![deny(unsafe_code)] // Le code unsafe est interdit
#![warn(missing_docs)] // Toute fonction, struct, enum ou module public doit être documenté
#![deny(unused_must_use)] // Oblige à gérer explicitement les Result et Option
#![deny(non_snake_case)] // Les noms de variables et fonctions doivent être en snake_case
#![deny(non_upper_case_globals)] // Les constantes et globals doivent être en MAJUSCULE
#![deny(nonstandard_style)] // Empêche tout style de code non standard
#![forbid(unsafe_op_in_unsafe_fn)]

// Clippy pour stricte discipline
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::unwrap_used)] // Interdit unwrap()
#![warn(clippy::expect_used)] // Interdit expect()
#![warn(clippy::panic)] // Interdit panic!()
#![warn(clippy::print_stdout)] // Interdit println!() en production
#![warn(clippy::todo)]
#![warn(clippy::unimplemented)]
#![warn(clippy::redundant_clone)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

/// Pet listings, reports, adoption applications and profiles.
#[allow(clippy::missing_errors_doc)]
pub mod catalog;
/// Chat widget sessions with delayed bot replies.
pub mod chat;
/// Shared ids, errors and configuration.
pub mod core;
/// FAQ corpus and the substring matcher.
pub mod faq;
/// HTTP server and API routes.
#[allow(clippy::missing_errors_doc, clippy::unused_async)]
pub mod server;
/// Entry helpers to start the Pet Connect server.
pub mod start_pet_connect;
/// `SQLite` connection and schema.
pub mod storage;
