//! # Parameter Declarations

use std::{fmt, rc::Rc};

use itertools::Itertools;

use super::{Assignment, PConstraint, PExpr, ParamSet, Substitution};
use crate::Error;

/// A named integer parameter ranging over `[min,max]`, filtered by a restriction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    name: Rc<str>,
    min: PExpr,
    max: PExpr,
    restriction: PConstraint,
}

impl Parameter {
    /// Creates an unrestricted parameter
    pub fn new(name: impl Into<Rc<str>>, min: impl Into<PExpr>, max: impl Into<PExpr>) -> Self {
        Self {
            name: name.into(),
            min: min.into(),
            max: max.into(),
            restriction: PConstraint::truth(),
        }
    }

    /// Adds a restriction that every value of the parameter has to satisfy
    #[must_use]
    pub fn restricted(mut self, restriction: PConstraint) -> Self {
        self.restriction = restriction;
        self
    }

    /// Gets the name of the parameter
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the name of the parameter as a shared string
    #[must_use]
    pub fn shared_name(&self) -> Rc<str> {
        Rc::clone(&self.name)
    }

    /// Gets the lower bound expression
    #[must_use]
    pub fn min(&self) -> &PExpr {
        &self.min
    }

    /// Gets the upper bound expression
    #[must_use]
    pub fn max(&self) -> &PExpr {
        &self.max
    }

    /// Gets the restriction
    #[must_use]
    pub fn restriction(&self) -> &PConstraint {
        &self.restriction
    }

    /// Gets the parameters referenced by the bounds. The restriction may additionally refer
    /// to the parameter itself.
    #[must_use]
    pub fn bound_params(&self) -> ParamSet {
        let mut params = ParamSet::new();
        self.min.collect_params(&mut params);
        self.max.collect_params(&mut params);
        params
    }

    /// Gets the free parameters of the bounds and the restriction, without the parameter
    /// itself
    #[must_use]
    pub fn free_params(&self) -> ParamSet {
        let mut params = self.bound_params();
        self.restriction.collect_params(&mut params);
        params.remove(self.name());
        params
    }

    /// Checks whether the range and restriction contain no outside parameters
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.free_params().is_empty()
    }

    /// Replaces outside parameters in the range and the restriction. The parameter itself
    /// is never replaced in its restriction.
    #[must_use]
    pub fn substitute(&self, substitution: &Substitution) -> Parameter {
        Parameter {
            name: Rc::clone(&self.name),
            min: self.min.substitute(substitution),
            max: self.max.substitute(substitution),
            restriction: self
                .restriction
                .substitute(&substitution.without(self.name())),
        }
    }

    /// Enumerates the values of a closed parameter that satisfy its restriction
    ///
    /// # Errors
    ///
    /// [`Error::NotClosed`] if the range or the restriction refers to other parameters.
    pub fn values(&self) -> Result<Vec<i64>, Error> {
        if !self.is_closed() {
            return Err(Error::NotClosed {
                term: self.to_string(),
                operation: "enumerate",
            });
        }
        let empty = Assignment::new();
        let (min, max) = (self.min.evaluate(&empty)?, self.max.evaluate(&empty)?);
        let mut values = Vec::new();
        for val in min..=max {
            if self.restriction.evaluate(&empty.with(self.shared_name(), val))? {
                values.push(val);
            }
        }
        Ok(values)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in [{}..{}]", self.name, self.min, self.max)?;
        if self.restriction != PConstraint::truth() {
            write!(f, " with {}", self.restriction)?;
        }
        Ok(())
    }
}

/// An ordered list of parameters in which every parameter only depends on the parameters
/// before it
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParameterList {
    params: Vec<Parameter>,
}

impl ParameterList {
    /// Creates a validated parameter list
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateParameter`] if a name occurs twice
    /// - [`Error::ForwardReference`] if bounds refer to the parameter itself or to a later
    ///   or unknown parameter, or if a restriction refers to a later or unknown parameter
    pub fn new(params: Vec<Parameter>) -> Result<Self, Error> {
        let mut declared = ParamSet::new();
        for param in &params {
            if declared.contains(param.name()) {
                return Err(Error::DuplicateParameter(param.name().to_string()));
            }
            if let Some(reference) = param
                .bound_params()
                .into_iter()
                .find(|p| !declared.contains(p))
            {
                return Err(Error::ForwardReference {
                    parameter: param.name().to_string(),
                    reference: reference.to_string(),
                });
            }
            declared.insert(param.shared_name());
            if let Some(reference) = param
                .restriction
                .params()
                .into_iter()
                .find(|p| !declared.contains(p))
            {
                return Err(Error::ForwardReference {
                    parameter: param.name().to_string(),
                    reference: reference.to_string(),
                });
            }
        }
        Ok(Self { params })
    }

    /// Creates an empty parameter list
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Gets the number of parameters
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Checks whether the list has no parameters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterates over the parameters in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.params.iter()
    }

    /// Gets a parameter by its position
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&Parameter> {
        self.params.get(idx)
    }

    /// Gets the parameter names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(Parameter::name)
    }
}

impl<'a> IntoIterator for &'a ParameterList {
    type Item = &'a Parameter;

    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

impl fmt::Display for ParameterList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.params.iter().format(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::{Parameter, ParameterList};
    use crate::{
        params::{CmpOp, PConstraint, PExpr},
        Error,
    };

    #[test]
    fn dependent_bounds() {
        let list = ParameterList::new(vec![
            Parameter::new("i", 1, 3),
            Parameter::new("j", PExpr::param("i"), 3),
        ])
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.names().collect::<Vec<_>>(), vec!["i", "j"]);
        assert_eq!(format!("{list}"), "i in [1..3], j in [i..3]");
    }

    #[test]
    fn forward_reference() {
        let res = ParameterList::new(vec![
            Parameter::new("i", 1, PExpr::param("j")),
            Parameter::new("j", 1, 3),
        ]);
        assert_eq!(
            res,
            Err(Error::ForwardReference {
                parameter: "i".to_string(),
                reference: "j".to_string()
            })
        );
    }

    #[test]
    fn self_reference_in_bounds() {
        let res = ParameterList::new(vec![Parameter::new("i", 1, PExpr::param("i") + 1)]);
        assert!(matches!(res, Err(Error::ForwardReference { .. })));
    }

    #[test]
    fn self_reference_in_restriction() {
        let restr = PConstraint::cmp(CmpOp::Neq, PExpr::param("j"), PExpr::param("i"));
        let list = ParameterList::new(vec![
            Parameter::new("i", 1, 3),
            Parameter::new("j", 1, 3).restricted(restr),
        ])
        .unwrap();
        assert_eq!(format!("{list}"), "i in [1..3], j in [1..3] with (j != i)");
        assert!(list.get(1).unwrap().free_params().contains("i"));
    }

    #[test]
    fn duplicate() {
        let res = ParameterList::new(vec![Parameter::new("i", 1, 3), Parameter::new("i", 1, 3)]);
        assert_eq!(res, Err(Error::DuplicateParameter("i".to_string())));
    }
}
