#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use lumen_reflect as reflect;
pub use lumen_utils as utils;
