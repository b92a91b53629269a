//! Block-text rendering (`TAG { key = value }`)

use std::fmt;

use crate::ConfigNode;

impl ConfigNode {
    fn write_block(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "\t".repeat(depth);
        writeln!(f, "{indent}{}", self.tag())?;
        writeln!(f, "{indent}{{")?;
        for (name, value) in self.values() {
            writeln!(f, "{indent}\t{name} = {value}")?;
        }
        for child in self.nodes() {
            child.write_block(f, depth + 1)?;
        }
        writeln!(f, "{indent}}}")
    }
}

impl fmt::Display for ConfigNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_block(f, 0)
    }
}
