//! # Size Finder Telegram Bot
//!
//! A Telegram bot that walks shoppers from a product link to a size
//! recommendation by matching their body measurements against the shop's
//! size charts.

pub mod bot;
pub mod catalog;
pub mod db;
pub mod dialogue;
pub mod matching;
pub mod url_classifier;
pub mod wizard;
