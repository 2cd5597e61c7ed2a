mod quiz_attempt;
mod scoring;
