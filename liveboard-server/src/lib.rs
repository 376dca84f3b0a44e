//! Railway liveboard server.
//!
//! A web client for the iRail API: a station liveboard linking to a detail
//! page for each train, with its upcoming stops and composition.

pub mod config;
pub mod irail;
pub mod view;
pub mod web;
