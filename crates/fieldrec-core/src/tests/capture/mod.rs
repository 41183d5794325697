mod policy;
mod writer;
