//! Member scanner: the declarative marker table of an injectable type.
//!
//! A type lists its injectable members once, in [`Injectable::declare_members`].
//! The scanner turns that declaration into the ordered descriptor list of a
//! [`TypePlan`].

use std::any::Any;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::InjectResult;
use crate::injection::member::{
    downcast_target, MemberAction, MemberCategory, MemberDescriptor, MemberIdentity, Nested, Projection,
    Visibility,
};
use crate::injection::TypePlan;
use crate::key::Key;
use crate::traits::{AnyArc, Dependency, MethodArgs};

/// A type whose instances can receive injected members.
///
/// The `Default` supertrait is the zero-argument constructor contract: every
/// type the engine may meet in the tree can be built without arguments. The
/// engine itself never constructs targets.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{Injectable, MemberScanner};
/// use std::sync::Arc;
///
/// struct Clock;
///
/// #[derive(Default)]
/// struct Hud {
///     clock: Option<Arc<Clock>>,
///     ready: bool,
/// }
///
/// impl Injectable for Hud {
///     fn declare_members(members: &mut MemberScanner<Self>) {
///         members
///             .field("clock")
///             .private()
///             .inject(|hud: &mut Self, clock: Arc<Clock>| hud.clock = Some(clock))
///             .method("on_ready")
///             .inject(|hud: &mut Self, (): ()| hud.ready = true);
///     }
/// }
/// ```
pub trait Injectable: Default + Any {
    /// Declares the injectable members of `Self`.
    ///
    /// Members not declared here are never touched. The default declares
    /// nothing.
    fn declare_members(members: &mut MemberScanner<Self>) {
        let _ = members;
    }
}

/// Object-safe view of an injection target.
///
/// Implemented for every [`Injectable`] type; the engine only ever sees
/// targets as `&mut dyn InjectTarget`, so nested members are injected using
/// their runtime type.
pub trait InjectTarget: Any {
    /// Key of the runtime type.
    fn target_key(&self) -> Key;

    /// Scans the runtime type's members (uncached).
    fn scan_plan(&self) -> TypePlan;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Injectable> InjectTarget for T {
    fn target_key(&self) -> Key {
        Key::of::<T>()
    }

    fn scan_plan(&self) -> TypePlan {
        scan_type::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl dyn InjectTarget {
    /// Whether the runtime type is `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// A value a recursive-members member can hold: a concrete injectable type
/// or a boxed `dyn InjectTarget`.
pub trait NestedTarget {
    fn as_target_mut(&mut self) -> &mut dyn InjectTarget;
}

impl<T: Injectable> NestedTarget for T {
    fn as_target_mut(&mut self) -> &mut dyn InjectTarget {
        self
    }
}

impl NestedTarget for dyn InjectTarget {
    fn as_target_mut(&mut self) -> &mut dyn InjectTarget {
        self
    }
}

/// Scans `T`'s declared members into a plan without touching any cache.
pub fn scan_type<T: Injectable>() -> TypePlan {
    let mut scanner = MemberScanner::<T>::new();
    T::declare_members(&mut scanner);
    TypePlan::new(Key::of::<T>(), scanner.finish())
}

/// Builder handed to [`Injectable::declare_members`].
///
/// The resulting order is fixed no matter how the calls are interleaved:
/// the type's own fields and properties in declaration order, then its own
/// methods in declaration order, then every base declared with
/// [`extends`](Self::extends), each contributing its complete ordered list.
pub struct MemberScanner<T: Injectable> {
    values: Vec<MemberDescriptor>,
    methods: Vec<MemberDescriptor>,
    bases: Vec<MemberDescriptor>,
    _target: PhantomData<fn(&mut T)>,
}

impl<T: Injectable> MemberScanner<T> {
    pub(crate) fn new() -> Self {
        Self {
            values: Vec::new(),
            methods: Vec::new(),
            bases: Vec::new(),
            _target: PhantomData,
        }
    }

    /// Starts the declaration of a field.
    pub fn field(&mut self, name: &'static str) -> ValueMember<'_, T> {
        ValueMember::new(self, name, MemberCategory::Field)
    }

    /// Starts the declaration of a property (a setter-backed member).
    pub fn property(&mut self, name: &'static str) -> ValueMember<'_, T> {
        ValueMember::new(self, name, MemberCategory::Property)
    }

    /// Starts the declaration of an injected method.
    pub fn method(&mut self, name: &'static str) -> MethodMember<'_, T> {
        MethodMember {
            scanner: self,
            name,
            visibility: Visibility::default(),
        }
    }

    /// Pulls in the members of base `B`, which `T` embeds.
    ///
    /// `project` borrows the embedded base out of a `T`. The base's members
    /// come after all of `T`'s own members and keep their own order.
    ///
    /// ```
    /// use ferrous_inject::{Injectable, MemberScanner};
    /// use std::sync::Arc;
    ///
    /// struct Audio;
    ///
    /// #[derive(Default)]
    /// struct Actor {
    ///     audio: Option<Arc<Audio>>,
    /// }
    ///
    /// impl Injectable for Actor {
    ///     fn declare_members(members: &mut MemberScanner<Self>) {
    ///         members.field("audio").inject(|a: &mut Self, audio: Arc<Audio>| a.audio = Some(audio));
    ///     }
    /// }
    ///
    /// #[derive(Default)]
    /// struct Player {
    ///     actor: Actor,
    /// }
    ///
    /// impl Injectable for Player {
    ///     fn declare_members(members: &mut MemberScanner<Self>) {
    ///         members.extends(|p: &mut Self| &mut p.actor);
    ///     }
    /// }
    /// ```
    pub fn extends<B, P>(&mut self, project: P) -> &mut Self
    where
        B: Injectable,
        P: Fn(&mut T) -> &mut B + Send + Sync + 'static,
    {
        let project: Projection<T, B> = Arc::new(project);
        let mut base = MemberScanner::<B>::new();
        B::declare_members(&mut base);
        self.bases
            .extend(base.finish().into_iter().map(|descriptor| descriptor.lift(&project)));
        self
    }

    pub(crate) fn finish(self) -> Vec<MemberDescriptor> {
        let mut descriptors = self.values;
        descriptors.extend(self.methods);
        descriptors.extend(self.bases);
        descriptors
    }

    fn identity(name: &'static str, category: MemberCategory, visibility: Visibility) -> MemberIdentity {
        MemberIdentity::new(std::any::type_name::<T>(), name, category, visibility)
    }
}

/// A field or property being declared.
///
/// Consumed by exactly one marker: [`inject`](Self::inject),
/// [`inject_members`](Self::inject_members) or
/// [`inject_members_shared`](Self::inject_members_shared).
#[must_use = "a member is only registered once a marker is applied"]
pub struct ValueMember<'s, T: Injectable> {
    scanner: &'s mut MemberScanner<T>,
    name: &'static str,
    category: MemberCategory,
    visibility: Visibility,
}

impl<'s, T: Injectable> ValueMember<'s, T> {
    fn new(scanner: &'s mut MemberScanner<T>, name: &'static str, category: MemberCategory) -> Self {
        Self {
            scanner,
            name,
            category,
            visibility: Visibility::default(),
        }
    }

    pub fn public(mut self) -> Self {
        self.visibility = Visibility::Public;
        self
    }

    pub fn protected(mut self) -> Self {
        self.visibility = Visibility::Protected;
        self
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Direct-value marker: the member receives the value resolved for `D`.
    pub fn inject<D, F>(self, assign: F) -> &'s mut MemberScanner<T>
    where
        D: Dependency + 'static,
        F: Fn(&mut T, D) + Send + Sync + 'static,
    {
        let action = MemberAction::Assign {
            key: D::key(),
            assign: Arc::new(move |target: &mut dyn Any, value: AnyArc| -> InjectResult<()> {
                let value = D::from_resolved(value)?;
                assign(downcast_target::<T>(target)?, value);
                Ok(())
            }),
        };
        self.push(action)
    }

    /// Recursive-members marker for a value the target owns.
    ///
    /// `read` returns the member's current value; `None` means there is
    /// nothing to descend into and the member is left alone.
    pub fn inject_members<N, F>(self, read: F) -> &'s mut MemberScanner<T>
    where
        N: ?Sized + NestedTarget + 'static,
        F: Fn(&mut T) -> Option<&mut N> + Send + Sync + 'static,
    {
        let action = MemberAction::Descend {
            declared: Key::of::<N>(),
            descend: Arc::new(
                move |target: &mut dyn Any,
                      visit: &mut dyn FnMut(Nested<'_>) -> InjectResult<()>|
                      -> InjectResult<()> {
                    match read(downcast_target::<T>(target)?) {
                        Some(nested) => visit(Nested::Owned(nested.as_target_mut())),
                        None => Ok(()),
                    }
                },
            ),
        };
        self.push(action)
    }

    /// Recursive-members marker for a value shared through `Rc<RefCell<_>>`.
    pub fn inject_members_shared<N, F>(self, read: F) -> &'s mut MemberScanner<T>
    where
        N: Injectable,
        F: Fn(&T) -> Option<&Rc<RefCell<N>>> + Send + Sync + 'static,
    {
        let action = MemberAction::Descend {
            declared: Key::of::<N>(),
            descend: Arc::new(
                move |target: &mut dyn Any,
                      visit: &mut dyn FnMut(Nested<'_>) -> InjectResult<()>|
                      -> InjectResult<()> {
                    let this: &T = downcast_target::<T>(target)?;
                    match read(this) {
                        Some(cell) => {
                            let shared: Rc<RefCell<dyn crate::injection::InjectTarget>> = cell.clone();
                            visit(Nested::Shared(shared))
                        }
                        None => Ok(()),
                    }
                },
            ),
        };
        self.push(action)
    }

    fn push(self, action: MemberAction) -> &'s mut MemberScanner<T> {
        let identity = MemberScanner::<T>::identity(self.name, self.category, self.visibility);
        self.scanner.values.push(MemberDescriptor::new(identity, action));
        self.scanner
    }
}

/// A method being declared.
#[must_use = "a method is only registered once `inject` is applied"]
pub struct MethodMember<'s, T: Injectable> {
    scanner: &'s mut MemberScanner<T>,
    name: &'static str,
    visibility: Visibility,
}

impl<'s, T: Injectable> MethodMember<'s, T> {
    pub fn public(mut self) -> Self {
        self.visibility = Visibility::Public;
        self
    }

    pub fn protected(mut self) -> Self {
        self.visibility = Visibility::Protected;
        self
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Method-injection marker: every parameter in `A` is resolved in order,
    /// then `call` runs with the resolved arguments.
    pub fn inject<A, F>(self, call: F) -> &'s mut MemberScanner<T>
    where
        A: MethodArgs + 'static,
        F: Fn(&mut T, A) + Send + Sync + 'static,
    {
        let action = MemberAction::Invoke {
            params: A::keys(),
            invoke: Arc::new(move |target: &mut dyn Any, values: Vec<AnyArc>| -> InjectResult<()> {
                let args = A::from_resolved(values)?;
                call(downcast_target::<T>(target)?, args);
                Ok(())
            }),
        };
        let identity = MemberScanner::<T>::identity(self.name, MemberCategory::Method, self.visibility);
        self.scanner.methods.push(MemberDescriptor::new(identity, action));
        self.scanner
    }
}
