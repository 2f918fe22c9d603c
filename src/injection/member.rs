//! Member injection descriptors.
//!
//! A descriptor is the scanned unit of work for one member of a type: assign
//! a resolved value, descend into a nested target, or call a method with
//! resolved arguments.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::{InjectError, InjectResult};
use crate::injection::InjectTarget;
use crate::key::Key;
use crate::traits::AnyArc;

/// What the injector does with a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Resolve the declared type and assign it to the member.
    DirectValue,
    /// Treat the member's current value as a nested injection target.
    RecursiveMembers,
    /// Resolve every parameter and call the method.
    MethodParams,
}

/// Declared visibility of a member.
///
/// Metadata only: members of every visibility are injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// Kind of member a descriptor was declared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberCategory {
    Field,
    Property,
    Method,
}

/// Identity of a declared member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberIdentity {
    declaring_type: &'static str,
    name: &'static str,
    category: MemberCategory,
    visibility: Visibility,
}

impl MemberIdentity {
    pub(crate) fn new(
        declaring_type: &'static str,
        name: &'static str,
        category: MemberCategory,
        visibility: Visibility,
    ) -> Self {
        Self {
            declaring_type,
            name,
            category,
            visibility,
        }
    }

    /// Type name of the type that declared the member (a base type for
    /// members pulled in through `extends`).
    pub fn declaring_type(&self) -> &'static str {
        self.declaring_type
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn category(&self) -> MemberCategory {
        self.category
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }
}

impl fmt::Display for MemberIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_type, self.name)
    }
}

/// A nested target handed to the injector by a recursive-members member.
pub(crate) enum Nested<'a> {
    /// A value owned by the parent (`Option<B>`, `Option<Box<dyn InjectTarget>>`).
    Owned(&'a mut dyn InjectTarget),
    /// A value shared with other owners.
    Shared(Rc<RefCell<dyn InjectTarget>>),
}

pub(crate) type AssignFn = Arc<dyn Fn(&mut dyn Any, AnyArc) -> InjectResult<()> + Send + Sync>;
pub(crate) type DescendFn = Arc<
    dyn Fn(&mut dyn Any, &mut dyn FnMut(Nested<'_>) -> InjectResult<()>) -> InjectResult<()>
        + Send
        + Sync,
>;
pub(crate) type InvokeFn = Arc<dyn Fn(&mut dyn Any, Vec<AnyArc>) -> InjectResult<()> + Send + Sync>;

/// Projection from a type to the base value it embeds.
pub(crate) type Projection<D, B> = Arc<dyn Fn(&mut D) -> &mut B + Send + Sync>;

/// Type-erased member operation. Every closure downcasts the `&mut dyn Any`
/// it receives to the declaring type first.
#[derive(Clone)]
pub(crate) enum MemberAction {
    Assign { key: Key, assign: AssignFn },
    Descend { declared: Key, descend: DescendFn },
    Invoke { params: Vec<Key>, invoke: InvokeFn },
}

impl MemberAction {
    /// Re-targets an action declared on base `B` at a type `D` embedding it.
    pub(crate) fn lift<D: Any, B: Any>(self, project: &Projection<D, B>) -> Self {
        let project = project.clone();
        match self {
            MemberAction::Assign { key, assign } => MemberAction::Assign {
                key,
                assign: Arc::new(move |target: &mut dyn Any, value: AnyArc| -> InjectResult<()> {
                    let base: &mut dyn Any = project(downcast_target::<D>(target)?);
                    assign(base, value)
                }),
            },
            MemberAction::Descend { declared, descend } => MemberAction::Descend {
                declared,
                descend: Arc::new(
                    move |target: &mut dyn Any,
                          visit: &mut dyn FnMut(Nested<'_>) -> InjectResult<()>|
                          -> InjectResult<()> {
                        let base: &mut dyn Any = project(downcast_target::<D>(target)?);
                        descend(base, visit)
                    },
                ),
            },
            MemberAction::Invoke { params, invoke } => MemberAction::Invoke {
                params,
                invoke: Arc::new(move |target: &mut dyn Any, values: Vec<AnyArc>| -> InjectResult<()> {
                    let base: &mut dyn Any = project(downcast_target::<D>(target)?);
                    invoke(base, values)
                }),
            },
        }
    }
}

/// One member's injection descriptor: identity, declared type(s) and kind.
#[derive(Clone)]
pub struct MemberDescriptor {
    identity: MemberIdentity,
    action: MemberAction,
}

impl MemberDescriptor {
    pub(crate) fn new(identity: MemberIdentity, action: MemberAction) -> Self {
        Self { identity, action }
    }

    pub fn identity(&self) -> &MemberIdentity {
        &self.identity
    }

    pub fn name(&self) -> &'static str {
        self.identity.name
    }

    pub fn kind(&self) -> MemberKind {
        match self.action {
            MemberAction::Assign { .. } => MemberKind::DirectValue,
            MemberAction::Descend { .. } => MemberKind::RecursiveMembers,
            MemberAction::Invoke { .. } => MemberKind::MethodParams,
        }
    }

    /// Declared types: the member's type for fields and properties, the
    /// parameter types in order for methods.
    pub fn declared_types(&self) -> &[Key] {
        match &self.action {
            MemberAction::Assign { key, .. } => std::slice::from_ref(key),
            MemberAction::Descend { declared, .. } => std::slice::from_ref(declared),
            MemberAction::Invoke { params, .. } => params,
        }
    }

    pub(crate) fn action(&self) -> &MemberAction {
        &self.action
    }

    pub(crate) fn lift<D: Any, B: Any>(self, project: &Projection<D, B>) -> Self {
        Self {
            identity: self.identity,
            action: self.action.lift(project),
        }
    }
}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("member", &format_args!("{}", self.identity))
            .field("category", &self.identity.category)
            .field("visibility", &self.identity.visibility)
            .field("kind", &self.kind())
            .field("declared", &self.declared_types())
            .finish()
    }
}

pub(crate) fn downcast_target<T: Any>(target: &mut dyn Any) -> InjectResult<&mut T> {
    target
        .downcast_mut::<T>()
        .ok_or(InjectError::TypeMismatch(std::any::type_name::<T>()))
}
