#![cfg(feature = "test-utils")]

mod buckets_test;
mod extract_test;
mod transform_test;
