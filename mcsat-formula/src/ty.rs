//! Types used to classify terms.
use std::fmt;

use rustc_hash::FxHashMap;

/// The backing type used to index interned types.
pub type TypeIdx = u32;

/// A hash-consed type.
///
/// Equality is id equality: two `TypeId`s compare equal iff they were interned from
/// structurally equal [`TypeData`] by the same [`TypeBank`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct TypeId {
    index: TypeIdx,
}

impl TypeId {
    /// The 0-based index assigned by the interning [`TypeBank`].
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ty{}", self.index)
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
enum TypeData {
    Bool,
    Rat,
    Uninterpreted(String),
    Arrow(TypeId, TypeId),
}

/// Hash-consing table for [`TypeId`]s.
///
/// Mirrors the intern-by-structural-hash approach used for terms (see
/// [`crate::term::TermBank`]): a type is only ever allocated once, so id equality is
/// structural equality. Localized per [`crate::Env`] rather than global, so distinct solver
/// instances never share tables.
#[derive(Default, Debug)]
pub struct TypeBank {
    data: Vec<TypeData>,
    index: FxHashMap<TypeData, TypeId>,
}

impl TypeBank {
    pub fn new() -> TypeBank {
        TypeBank::default()
    }

    fn intern(&mut self, data: TypeData) -> TypeId {
        if let Some(&id) = self.index.get(&data) {
            return id;
        }
        let id = TypeId {
            index: self.data.len() as TypeIdx,
        };
        self.data.push(data.clone());
        self.index.insert(data, id);
        id
    }

    /// The `Bool` type.
    pub fn bool_ty(&mut self) -> TypeId {
        self.intern(TypeData::Bool)
    }

    /// The `Rat` type. Reserved by the input grammar; no core rule imposes arithmetic
    /// semantics on it, it is tracked like any other uninterpreted sort.
    pub fn rat_ty(&mut self) -> TypeId {
        self.intern(TypeData::Rat)
    }

    /// Declares a fresh uninterpreted type with the given surface name.
    ///
    /// Two calls with the same name return the same `TypeId`, matching the hash-consing
    /// contract. Distinct *declarations* with the same name are rejected earlier, at the
    /// symbol-table level (see [`crate::symbol::SymbolTable`]); this method alone cannot
    /// detect redeclaration.
    pub fn uninterpreted(&mut self, name: impl Into<String>) -> TypeId {
        self.intern(TypeData::Uninterpreted(name.into()))
    }

    /// Builds `Arrow(arg, ret)`.
    pub fn arrow(&mut self, arg: TypeId, ret: TypeId) -> TypeId {
        self.intern(TypeData::Arrow(arg, ret))
    }

    /// Builds the right-associated arrow chain `args[0] -> args[1] -> .. -> ret`.
    pub fn arrow_chain(&mut self, args: &[TypeId], ret: TypeId) -> TypeId {
        let mut result = ret;
        for &arg in args.iter().rev() {
            result = self.arrow(arg, result);
        }
        result
    }

    pub fn is_bool(&self, ty: TypeId) -> bool {
        matches!(self.data[ty.index()], TypeData::Bool)
    }

    pub fn is_rat(&self, ty: TypeId) -> bool {
        matches!(self.data[ty.index()], TypeData::Rat)
    }

    pub fn is_uninterpreted(&self, ty: TypeId) -> bool {
        matches!(self.data[ty.index()], TypeData::Uninterpreted(_))
    }

    pub fn is_arrow(&self, ty: TypeId) -> bool {
        matches!(self.data[ty.index()], TypeData::Arrow(..))
    }

    /// Destructures a right-associated arrow chain into `(arg-list, return-type)`.
    ///
    /// For a non-arrow type this returns `(vec![], ty)`.
    pub fn open(&self, ty: TypeId) -> (Vec<TypeId>, TypeId) {
        let mut args = vec![];
        let mut cur = ty;
        while let TypeData::Arrow(arg, ret) = self.data[cur.index()] {
            args.push(arg);
            cur = ret;
        }
        (args, cur)
    }

    /// Surface-syntax name of a declared uninterpreted type, if any.
    pub fn name(&self, ty: TypeId) -> Option<&str> {
        match &self.data[ty.index()] {
            TypeData::Uninterpreted(name) => Some(name),
            _ => None,
        }
    }

    /// Renders a type using the surface syntax: `bool`, `rat`, a declared name, or
    /// `(-> t1 .. tn tret)`.
    pub fn display(&self, ty: TypeId) -> String {
        match &self.data[ty.index()] {
            TypeData::Bool => "bool".to_owned(),
            TypeData::Rat => "rat".to_owned(),
            TypeData::Uninterpreted(name) => name.clone(),
            TypeData::Arrow(..) => {
                let (args, ret) = self.open(ty);
                let mut out = String::from("(->");
                for arg in args {
                    out.push(' ');
                    out.push_str(&self.display(arg));
                }
                out.push(' ');
                out.push_str(&self.display(ret));
                out.push(')');
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_structure_same_id() {
        let mut types = TypeBank::new();
        let u1 = types.uninterpreted("U");
        let u2 = types.uninterpreted("U");
        assert_eq!(u1, u2);

        let bool_ty1 = types.bool_ty();
        let a1 = types.arrow(u1, bool_ty1);
        let bool_ty2 = types.bool_ty();
        let a2 = types.arrow(u2, bool_ty2);
        assert_eq!(a1, a2);
    }

    #[test]
    fn distinct_names_distinct_types() {
        let mut types = TypeBank::new();
        let u = types.uninterpreted("U");
        let v = types.uninterpreted("V");
        assert_ne!(u, v);
    }

    #[test]
    fn open_arrow_chain() {
        let mut types = TypeBank::new();
        let u = types.uninterpreted("U");
        let b = types.bool_ty();
        let ty = types.arrow_chain(&[u, u], b);
        let (args, ret) = types.open(ty);
        assert_eq!(args, vec![u, u]);
        assert_eq!(ret, b);
    }

    #[test]
    fn display_arrow() {
        let mut types = TypeBank::new();
        let u = types.uninterpreted("U");
        let b = types.bool_ty();
        let ty = types.arrow_chain(&[u, u], b);
        assert_eq!(types.display(ty), "(-> U U bool)");
    }
}
