// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! User interaction strings are stored here.

pub const MENU: &str = "Please select a method for generating random numbers:
 1. Platform random function
 2. Linear Congruential Generator
      (or type 'q' to quit)
";

pub const COUNT_PROMPT: &str = "How many observations should we perform?";
pub const PROMPT: &str = ">>> ";
pub const SELECTOR_HELP: &str = "Please select a number from 1 to 2.";

pub const HEAVY_RULE: &str = "======================================";
pub const LIGHT_RULE: &str = "....................................";
pub const CHI_SQUARED_HEADER: &str = "---------CHI-SQ_TEST-----------";
pub const KS_HEADER: &str = "---------KS_TEST-----------";
