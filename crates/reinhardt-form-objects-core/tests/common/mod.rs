//! Form types shared by the form object integration tests.

#![allow(dead_code)]

pub mod forms;
