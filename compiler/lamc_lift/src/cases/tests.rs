use lamc_ir::{Environment, GlobalKind, InductiveInfo, Name, NameSupply};
use pretty_assertions::assert_eq;

use crate::lift::LambdaLifter;
use crate::test_helpers::Fixture;
use crate::{LiftError, DEFAULT_SUFFIX};

// Minor premises

#[test]
fn minor_premises_stay_inline() {
    // fun xs => List.casesOn xs 0 (fun h t => g h t)
    let mut fx = Fixture::new();
    let xs = fx.binder("xs");
    let h = fx.binder("h");
    let t = fx.binder("t");
    let (xsr, hr, tr) = (fx.var(xs), fx.var(h), fx.var(t));
    let zero = fx.arena.nat(0);
    let arm = fx.call("g", &[hr, tr]);
    let arm = fx.lam(&[h, t], arm);
    let cases = fx.call("List.casesOn", &[xsr, zero, arm]);
    let body = fx.lam(&[xs], cases);
    let foo = fx.proc("foo", body);

    let out = fx.lift(&[foo]).unwrap();

    assert_eq!(fx.names(&out), vec!["foo"]);
    fx.assert_alpha_eq(out[0].body, body);
}

#[test]
fn eta_contracted_minor_premises_are_expanded() {
    // List.casesOn xs 0 g  ~>  List.casesOn xs 0 (fun a a => g a a)
    // Pair.casesOn p (fun h => g h)  ~>  Pair.casesOn p (fun h a => g h a)
    let mut fx = Fixture::new();
    let xs = fx.binder("xs");
    let p = fx.binder("p");
    let h = fx.binder("h");
    let (xsr, pr, hr) = (fx.var(xs), fx.var(p), fx.var(h));
    let zero = fx.arena.nat(0);
    let g = fx.global("g");
    let list_cases = fx.call("List.casesOn", &[xsr, zero, g]);
    let list_body = fx.lam(&[xs], list_cases);
    let gh = fx.call("g", &[hr]);
    let pair_arm = fx.lam(&[h], gh);
    let pair_cases = fx.call("Pair.casesOn", &[pr, pair_arm]);
    let pair_body = fx.lam(&[p], pair_cases);
    let on_list = fx.proc("on_list", list_body);
    let on_pair = fx.proc("on_pair", pair_body);

    let out = fx.lift(&[on_list, on_pair]).unwrap();

    assert_eq!(fx.names(&out), vec!["on_list", "on_pair"]);

    let a1 = fx.binder("a");
    let a2 = fx.binder("a");
    let (a1r, a2r) = (fx.var(a1), fx.var(a2));
    let expanded = fx.call("g", &[a1r, a2r]);
    let expanded = fx.lam(&[a1, a2], expanded);
    let expected = fx.call("List.casesOn", &[xsr, zero, expanded]);
    let expected = fx.lam(&[xs], expected);
    fx.assert_alpha_eq(out[0].body, expected);

    let a = fx.binder("a");
    let ar = fx.var(a);
    let expanded = fx.call("g", &[hr, ar]);
    let expanded = fx.lam(&[h, a], expanded);
    let expected = fx.call("Pair.casesOn", &[pr, expanded]);
    let expected = fx.lam(&[p], expected);
    fx.assert_alpha_eq(out[1].body, expected);
}

#[test]
fn lambda_inside_a_minor_premise_captures_fields() {
    // fun xs => List.casesOn xs 0 (fun h t => g (fun z => Pair.mk z h))
    let mut fx = Fixture::new();
    let xs = fx.binder("xs");
    let h = fx.binder("h");
    let t = fx.binder("t");
    let z = fx.binder("z");
    let (xsr, hr, zr) = (fx.var(xs), fx.var(h), fx.var(z));
    let zero = fx.arena.nat(0);
    let pair = fx.call("Pair.mk", &[zr, hr]);
    let inner = fx.lam(&[z], pair);
    let arm = fx.call("g", &[inner]);
    let arm = fx.lam(&[h, t], arm);
    let cases = fx.call("List.casesOn", &[xsr, zero, arm]);
    let body = fx.lam(&[xs], cases);
    let foo = fx.proc("foo", body);

    let out = fx.lift(&[foo]).unwrap();

    assert_eq!(fx.names(&out), vec!["foo", "test._lambda_1"]);
    let expected_aux = fx.lam(&[h, z], pair);
    fx.assert_alpha_eq(out[1].body, expected_aux);
    let call = fx.call("test._lambda_1", &[hr]);
    let expected_arm = fx.call("g", &[call]);
    let expected_arm = fx.lam(&[h, t], expected_arm);
    let expected = fx.call("List.casesOn", &[xsr, zero, expected_arm]);
    let expected = fx.lam(&[xs], expected);
    fx.assert_alpha_eq(out[0].body, expected);
}

#[test]
fn major_premise_and_extra_arguments_are_lifted_in_order() {
    // List.casesOn (g (fun z => Pair.mk z)) 0 (fun h t => h) (fun w => Pair.fst w)
    let mut fx = Fixture::new();
    let z = fx.binder("z");
    let h = fx.binder("h");
    let t = fx.binder("t");
    let w = fx.binder("w");
    let (zr, hr, wr) = (fx.var(z), fx.var(h), fx.var(w));
    let mk = fx.call("Pair.mk", &[zr]);
    let mk = fx.lam(&[z], mk);
    let major = fx.call("g", &[mk]);
    let zero = fx.arena.nat(0);
    let arm = fx.lam(&[h, t], hr);
    let fst = fx.call("Pair.fst", &[wr]);
    let extra = fx.lam(&[w], fst);
    let body = fx.call("List.casesOn", &[major, zero, arm, extra]);
    let foo = fx.proc("foo", body);

    let out = fx.lift(&[foo]).unwrap();

    assert_eq!(
        fx.names(&out),
        vec!["foo", "test._lambda_1", "test._lambda_2"]
    );
    fx.assert_alpha_eq(out[1].body, mk);
    fx.assert_alpha_eq(out[2].body, extra);
    let first = fx.global("test._lambda_1");
    let second = fx.global("test._lambda_2");
    let major = fx.call("g", &[first]);
    let expected = fx.call("List.casesOn", &[major, zero, arm, second]);
    fx.assert_alpha_eq(out[0].body, expected);
}

// Malformed dispatch

#[test]
fn missing_minor_premise_is_an_arity_error() {
    let mut fx = Fixture::new();
    let xs = fx.binder("xs");
    let xsr = fx.var(xs);
    let zero = fx.arena.nat(0);
    let cases = fx.call("List.casesOn", &[xsr, zero]);
    let body = fx.lam(&[xs], cases);
    let foo = fx.proc("foo", body);

    assert_eq!(
        fx.lift(&[foo]),
        Err(LiftError::DispatchArity {
            dispatcher: "List.casesOn".to_owned(),
            expected: 3,
            found: 2,
        })
    );
}

#[test]
fn constructor_arity_below_parameter_count_is_an_error() {
    let mut fx = Fixture::new();
    let bad = fx.name("Bad");
    let bad_cases = fx.name("Bad.casesOn");
    let bad_mk = fx.name("Bad.mk");
    fx.env.add_inductive(bad, 2, bad_cases, &[(bad_mk, 1)]);
    let (zero, one) = (fx.arena.nat(0), fx.arena.nat(1));
    let body = fx.call("Bad.casesOn", &[zero, one]);
    let foo = fx.proc("foo", body);

    assert_eq!(
        fx.lift(&[foo]),
        Err(LiftError::ConstructorArity {
            constructor: "Bad.mk".to_owned(),
            arity: 1,
            params: 2,
        })
    );
}

/// Declares `Ghost.casesOn` as a dispatcher and little else.
struct DanglingDispatcher {
    dispatcher: Name,
    inductive: Name,
    info: Option<InductiveInfo>,
}

impl Environment for DanglingDispatcher {
    fn classify(&self, name: Name) -> Option<GlobalKind> {
        (name == self.dispatcher).then_some(GlobalKind::Dispatcher {
            inductive: self.inductive,
        })
    }

    fn inductive(&self, name: Name) -> Option<&InductiveInfo> {
        self.info.as_ref().filter(|_| name == self.inductive)
    }

    fn constructor_arity(&self, _: Name) -> Option<u32> {
        None
    }
}

#[test]
fn dispatcher_without_inductive_or_constructor_is_an_error() {
    let mut fx = Fixture::new();
    let mut env = DanglingDispatcher {
        dispatcher: fx.name("Ghost.casesOn"),
        inductive: fx.name("Ghost"),
        info: None,
    };
    let zero = fx.arena.nat(0);
    let body = fx.call("Ghost.casesOn", &[zero, zero]);
    let foo = fx.proc("foo", body);
    let prefix = fx.name("test");

    let supply = NameSupply::new(&fx.counter, &fx.interner, prefix, DEFAULT_SUFFIX);
    let lifter = LambdaLifter::new(&mut fx.arena, &env, &fx.interner, supply);
    assert_eq!(
        lifter.run(&[foo]),
        Err(LiftError::UnknownInductive {
            name: "Ghost".to_owned()
        })
    );

    env.info = Some(InductiveInfo {
        num_params: 0,
        constructors: vec![fx.name("Ghost.mk")],
    });
    let supply = NameSupply::new(&fx.counter, &fx.interner, prefix, DEFAULT_SUFFIX);
    let lifter = LambdaLifter::new(&mut fx.arena, &env, &fx.interner, supply);
    assert_eq!(
        lifter.run(&[foo]),
        Err(LiftError::UnknownConstructor {
            name: "Ghost.mk".to_owned()
        })
    );
}
