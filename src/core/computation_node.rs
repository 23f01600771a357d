// Copyright @yucwang 2021

pub trait ComputationNode {
    // Output string for a single computation node.
    fn describe(&self) -> String;
}
