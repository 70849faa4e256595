//! Derive and attribute macros for plur.
//!
//! - `Plurified`: implements `plur_core::Plurified` from a `#[plur(...)]` attribute
//! - `test_suite`: collects the `test*` methods of an `impl` block, in declaration order, into a
//!   `plur::testing::TestMethods` implementation

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{DeriveInput, FnArg, ImplItem, ItemImpl, LitStr, Path, Type, parse_macro_input};

/// Implements `plur_core::Plurified`.
///
/// # Example
/// ```ignore
/// #[derive(Plurified)]
/// #[plur(namepath = "plur-tests/unit/plur/UnitTest", extends = TestCase, implements(IPortable))]
/// struct UnitTest {
///     case: TestCase,
/// }
///
/// // Generates:
/// impl plur_core::Plurified for UnitTest {
///     fn class_info() -> plur_core::ClassInfo {
///         plur_core::ClassInfo::of::<Self>("plur-tests/unit/plur/UnitTest")
///             .extends(<TestCase as plur_core::Plurified>::class_info())
///             .with_interface::<IPortable>()
///     }
///     // plus `class()` and `as_any()`
/// }
/// ```
///
/// Without `namepath` the class inherits its parent's namepath.
#[proc_macro_derive(Plurified, attributes(plur))]
pub fn derive_plurified(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_plurified(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

#[derive(Default)]
struct PlurArgs {
    namepath: Option<LitStr>,
    extends: Option<Type>,
    implements: Vec<Path>,
}

fn parse_plur_args(input: &DeriveInput) -> syn::Result<PlurArgs> {
    let mut args = PlurArgs::default();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("plur")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("namepath") {
                args.namepath = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("extends") {
                args.extends = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("implements") {
                meta.parse_nested_meta(|inner| {
                    args.implements.push(inner.path.clone());
                    Ok(())
                })
            } else {
                Err(meta.error("expected `namepath`, `extends` or `implements`"))
            }
        })?;
    }
    Ok(args)
}

fn expand_plurified(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let args = parse_plur_args(input)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let base = match &args.namepath {
        Some(namepath) => quote! { ::plur_core::ClassInfo::of::<Self>(#namepath) },
        None if args.extends.is_some() => quote! { ::plur_core::ClassInfo::inheriting::<Self>() },
        None => {
            return Err(syn::Error::new_spanned(
                name,
                "a plurified class needs `#[plur(namepath = \"...\")]` or a parent to inherit it from",
            ));
        }
    };
    let parent = args.extends.iter().map(|parent| {
        quote! { .extends(<#parent as ::plur_core::Plurified>::class_info()) }
    });
    let interfaces = args.implements.iter().map(|iface| {
        quote! { .with_interface::<#iface>() }
    });

    Ok(quote! {
        impl #impl_generics ::plur_core::Plurified for #name #ty_generics #where_clause {
            fn class_info() -> ::plur_core::ClassInfo {
                #base #(#parent)* #(#interfaces)*
            }

            fn class(&self) -> ::plur_core::ClassInfo {
                <Self as ::plur_core::Plurified>::class_info()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }
    })
}

/// Collects test methods from an inherent `impl` block.
///
/// Every method whose name starts with `test` (except one named exactly `test`), takes `&self` or
/// `&mut self` and no other arguments is recorded, in declaration order. Methods may be `async` and may
/// return `()` or any `Result<(), E>` where `E: Into<plur::testing::FailureCause>`.
///
/// ```ignore
/// #[test_suite]
/// impl UnitTest {
///     fn test_constructor(&mut self) -> AssertResult { ... }
///     async fn test_emits(&mut self) -> AssertResult { ... }
/// }
/// ```
#[proc_macro_attribute]
pub fn test_suite(_args: TokenStream, item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as ItemImpl);
    match expand_test_suite(&item) {
        Ok(tokens) => tokens.into(),
        Err(err) => {
            let err = err.to_compile_error();
            quote! { #item #err }.into()
        }
    }
}

fn is_test_method(method: &syn::ImplItemFn) -> bool {
    let name = method.sig.ident.to_string();
    if !name.starts_with("test") || name == "test" {
        return false;
    }
    let mut inputs = method.sig.inputs.iter();
    let has_receiver = matches!(inputs.next(), Some(FnArg::Receiver(receiver)) if receiver.reference.is_some());
    has_receiver && inputs.next().is_none()
}

fn expand_test_suite(item: &ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(path, "#[test_suite] goes on an inherent impl block"));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(&item.generics, "#[test_suite] does not support generic subjects"));
    }
    let self_ty = &item.self_ty;

    let mut shims = Vec::new();
    let mut entries = Vec::new();
    for impl_item in &item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };
        if !is_test_method(method) {
            continue;
        }

        let ident = &method.sig.ident;
        let name = ident.to_string();
        let shim = format_ident!("__plur_invoke_{}", ident);
        let call = if method.sig.asyncness.is_some() {
            quote! { subject.#ident().await }
        } else {
            quote! { subject.#ident() }
        };

        shims.push(quote! {
            fn #shim<'a>(
                subject: &'a mut #self_ty,
            ) -> ::plur::testing::LocalBoxFuture<'a, ::plur::testing::TestOutcome> {
                ::std::boxed::Box::pin(async move {
                    ::plur::testing::IntoTestOutcome::into_outcome(#call)
                })
            }
        });
        entries.push(quote! { ::plur::testing::TestMethod::new(#name, #shim) });
    }

    Ok(quote! {
        #item

        impl ::plur::testing::TestMethods for #self_ty {
            fn methods() -> ::std::vec::Vec<::plur::testing::TestMethod<Self>> {
                #(#shims)*
                ::std::vec![#(#entries),*]
            }
        }
    })
}
