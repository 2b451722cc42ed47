// Utility Module
// File helpers used by the cipher driver

pub mod file_ops;
