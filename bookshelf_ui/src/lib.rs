//! State of the bookshelf catalog screen.
//!
//! Everything here is independent of rendering: the controller owns a
//! [`state::CatalogState`] and talks to the catalog service through a
//! [`gateway::CatalogGateway`], so the same logic can sit behind a terminal,
//! web or desktop front end.

pub mod controller;
pub mod form;
pub mod gateway;
pub mod reconcile;
pub mod state;
