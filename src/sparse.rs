//! Sparse lexical vectors derived from masked-language-model importances.
//!
//! A sparse encoder scores every vocabulary entry for every input token.
//! This module turns that `tokens x vocabulary` tensor into a compact
//! [`SparseVector`](vector::SparseVector) holding only the dimensions the
//! text activates:
//!
//! - **tensor**: [`ImportanceTensor`](tensor::ImportanceTensor) and its
//!   [`ValidityMask`](tensor::ValidityMask)
//! - **activation**: `log(1 + relu(x))` rectification of raw logits
//! - **extractor**: masked max pooling and zero pruning
//! - **vector**: the sparse vector type itself
//! - **vocab**: decoding dimensions back into tokens

pub mod activation;
pub mod extractor;
pub mod tensor;
pub mod vector;
pub mod vocab;
