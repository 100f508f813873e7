// ABOUTME: CrispSdk implementations behind the trait boundary.
// ABOUTME: Ships the scripted mock; real SDK glue lives with the host embedding.

pub mod mock;
