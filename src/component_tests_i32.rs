//! Component tests for HilbertRTreeI32 driven through the nearby traversal
//!
//! These compare every query against a brute-force pass over the same boxes.
