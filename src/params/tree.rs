//! # Parameter Trees
//!
//! A [`ParamTree`] stores one value for every admissible assignment of a
//! [`ParameterList`]. Level `k` of the tree corresponds to parameter `k` of the list: a
//! branch covers the range of that parameter under the values fixed above it. Values that
//! violate the restriction of a parameter are kept as absent markers, so that lookup is a
//! direct index computation on every level.

use tracing::debug;

use super::{Assignment, ParameterList};
use crate::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Node<T> {
    Absent,
    Leaf(T),
    Branch { min: i64, children: Vec<Node<T>> },
}

/// A dense table of values indexed by parameter assignments
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamTree<T> {
    name: String,
    params: ParameterList,
    root: Node<T>,
    n_leaves: usize,
    n_absent: usize,
}

impl<T> ParamTree<T> {
    /// Builds the tree for the declaration `name` by evaluating each parameter's bounds under
    /// the values of the parameters before it and calling `make` for every admissible
    /// assignment, in lexicographic order.
    ///
    /// # Errors
    ///
    /// If evaluating a bound or a restriction fails, or if `make` fails.
    pub fn new<F>(name: &str, params: &ParameterList, mut make: F) -> Result<Self, Error>
    where
        F: FnMut(&Assignment) -> Result<T, Error>,
    {
        let mut tree = Self {
            name: name.to_string(),
            params: params.clone(),
            root: Node::Absent,
            n_leaves: 0,
            n_absent: 0,
        };
        tree.root = tree.build(0, &Assignment::new(), &mut make)?;
        debug!(
            declaration = name,
            leaves = tree.n_leaves,
            absent = tree.n_absent,
            "built parameter tree"
        );
        Ok(tree)
    }

    fn build<F>(
        &mut self,
        level: usize,
        assignment: &Assignment,
        make: &mut F,
    ) -> Result<Node<T>, Error>
    where
        F: FnMut(&Assignment) -> Result<T, Error>,
    {
        let Some(param) = self.params.get(level).cloned() else {
            self.n_leaves += 1;
            return Ok(Node::Leaf(make(assignment)?));
        };
        let min = param.min().evaluate(assignment)?;
        let max = param.max().evaluate(assignment)?;
        let mut children = Vec::with_capacity(usize::try_from(max - min + 1).unwrap_or(0));
        for val in min..=max {
            let extended = assignment.with(param.shared_name(), val);
            if param.restriction().evaluate(&extended)? {
                children.push(self.build(level + 1, &extended, make)?);
            } else {
                self.n_absent += 1;
                children.push(Node::Absent);
            }
        }
        Ok(Node::Branch { min, children })
    }

    /// Gets the name of the declaration the tree belongs to
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the parameters indexing the tree
    #[must_use]
    pub fn params(&self) -> &ParameterList {
        &self.params
    }

    /// Gets the number of stored values
    #[must_use]
    pub fn len(&self) -> usize {
        self.n_leaves
    }

    /// Checks whether no value is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_leaves == 0
    }

    /// Looks up the value stored for the given parameter values. Returns `Ok(None)` if the
    /// values lie outside of the ranges or violate a restriction.
    ///
    /// # Errors
    ///
    /// [`Error::Arity`] if the number of values does not match the number of parameters.
    pub fn lookup(&self, values: &[i64]) -> Result<Option<&T>, Error> {
        if values.len() != self.params.len() {
            return Err(Error::Arity {
                name: self.name.clone(),
                expected: self.params.len(),
                found: values.len(),
            });
        }
        let mut node = &self.root;
        for &val in values {
            let Node::Branch { min, children } = node else {
                return Ok(None);
            };
            let Some(child) = usize::try_from(val - min)
                .ok()
                .and_then(|idx| children.get(idx))
            else {
                return Ok(None);
            };
            node = child;
        }
        match node {
            Node::Leaf(val) => Ok(Some(val)),
            _ => Ok(None),
        }
    }

    /// Looks up the value stored for an assignment to all parameters of the tree
    ///
    /// # Errors
    ///
    /// [`Error::UnboundParameter`] if the assignment does not bind all parameters.
    pub fn lookup_assignment(&self, assignment: &Assignment) -> Result<Option<&T>, Error> {
        let values = self
            .params
            .iter()
            .map(|p| {
                assignment.get(p.name()).ok_or_else(|| Error::UnboundParameter {
                    name: p.name().to_string(),
                    term: self.name.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.lookup(&values)
    }

    /// Iterates over all stored values together with their parameter values, in
    /// lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = (Vec<i64>, &T)> {
        let mut entries = Vec::with_capacity(self.n_leaves);
        collect_leaves(&self.root, &mut Vec::new(), &mut entries);
        entries.into_iter()
    }
}

fn collect_leaves<'a, T>(
    node: &'a Node<T>,
    prefix: &mut Vec<i64>,
    entries: &mut Vec<(Vec<i64>, &'a T)>,
) {
    match node {
        Node::Absent => (),
        Node::Leaf(val) => entries.push((prefix.clone(), val)),
        Node::Branch { min, children } => {
            for (val, child) in (*min..).zip(children) {
                prefix.push(val);
                collect_leaves(child, prefix, entries);
                prefix.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ParamTree;
    use crate::{
        params::{Assignment, CmpOp, PConstraint, PExpr, Parameter, ParameterList},
        Error,
    };

    fn triangle() -> ParameterList {
        // i in [1..3], j in [i..3] with j != 2
        ParameterList::new(vec![
            Parameter::new("i", 1, 3),
            Parameter::new("j", PExpr::param("i"), 3).restricted(PConstraint::cmp(
                CmpOp::Neq,
                PExpr::param("j"),
                PExpr::constant(2),
            )),
        ])
        .unwrap()
    }

    fn label(assign: &Assignment) -> Result<String, Error> {
        Ok(format!("{assign}"))
    }

    #[test]
    fn build_and_lookup() {
        let tree = ParamTree::new("P", &triangle(), label).unwrap();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.lookup(&[1, 3]), Ok(Some(&"{i=1, j=3}".to_string())));
        assert_eq!(tree.lookup(&[1, 2]), Ok(None));
        assert_eq!(tree.lookup(&[3, 1]), Ok(None));
        assert_eq!(tree.lookup(&[4, 4]), Ok(None));
        assert_eq!(tree.lookup(&[0, 1]), Ok(None));
        let keys: Vec<_> = tree.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![vec![1, 1], vec![1, 3], vec![2, 3], vec![3, 3]]);
    }

    #[test]
    fn wrong_arity() {
        let tree = ParamTree::new("P", &triangle(), label).unwrap();
        assert_eq!(
            tree.lookup(&[1]),
            Err(Error::Arity {
                name: "P".to_string(),
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn partial_assignment_is_an_error() {
        let tree = ParamTree::new("P", &triangle(), label).unwrap();
        let assign: Assignment = [("i", 1)].into_iter().collect();
        assert!(matches!(
            tree.lookup_assignment(&assign),
            Err(Error::UnboundParameter { name, .. }) if name == "j"
        ));
        let assign = assign.with("j", 1);
        assert!(tree.lookup_assignment(&assign).unwrap().is_some());
    }

    #[test]
    fn no_params() {
        let tree = ParamTree::new("x", &ParameterList::empty(), |_| Ok(7)).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.lookup(&[]), Ok(Some(&7)));
    }

    #[test]
    fn constructor_error_propagates() {
        let res = ParamTree::new("P", &triangle(), |_| -> Result<(), Error> {
            Err(Error::Redeclaration("P".to_string()))
        });
        assert!(res.is_err());
    }
}
