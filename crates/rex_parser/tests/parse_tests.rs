// End-to-end parse + dump tests for rex_parser
use rex_parser::{parse, parse_with_delimiters, SyntaxOptions};

fn dump(pattern: &str) -> String {
    parse(pattern, SyntaxOptions::traditional())
        .unwrap_or_else(|e| panic!("{pattern:?} failed: {e}"))
        .dump()
}

fn dump_extended(pattern: &str) -> String {
    parse(pattern, SyntaxOptions::EXTENDED_SYNTAX)
        .unwrap_or_else(|e| panic!("{pattern:?} failed: {e}"))
        .dump()
}

#[test]
fn alternation() {
    assert_eq!(dump("a|b|c"), "alternation(a,b,c)");
    assert_eq!(dump("a|"), "alternation(a,empty)");
    assert_eq!(dump("|a"), "alternation(empty,a)");
    assert_eq!(dump("|"), "alternation(empty,empty)");
    assert_eq!(dump(""), "empty");
}

#[test]
fn nested_capture_groups() {
    assert_eq!(dump("(a(b)c)"), "group_capture((a,group_capture(b),c))");
    assert_eq!(dump("()"), "group_capture(empty)");
    assert_eq!(dump("(|)"), "group_capture(alternation(empty,empty))");
}

#[test]
fn quantifiers() {
    assert_eq!(dump("a*"), "quant_zeroOrMore_eager(a)");
    assert_eq!(dump("a+?"), "quant_oneOrMore_reluctant(a)");
    assert_eq!(dump("a?+"), "quant_zeroOrOne_possessive(a)");
    assert_eq!(dump("a{3}"), "quant_exactly<3>_eager(a)");
    assert_eq!(dump("a{2,}"), "quant_nOrMore<2>_eager(a)");
    assert_eq!(dump("a{,4}"), "quant_uptoN<4>_eager(a)");
    assert_eq!(dump("a{2,4}?"), "quant_.range<2...4>_reluctant(a)");
    // A brace that spells no quantifier is literal text.
    assert_eq!(dump("a{x}"), "(a,{,x,})");
}

#[test]
fn group_kind_zoo() {
    assert_eq!(dump("(?:a)"), "group_nonCapture(a)");
    assert_eq!(dump("(?|a)"), "group_nonCaptureReset(a)");
    assert_eq!(dump("(?>a)"), "group_atomicNonCapturing(a)");
    assert_eq!(dump("(?=a)"), "group_lookahead(a)");
    assert_eq!(dump("(?!a)"), "group_negativeLookahead(a)");
    assert_eq!(dump("(?<=a)"), "group_lookbehind(a)");
    assert_eq!(dump("(?<!a)"), "group_negativeLookbehind(a)");
    assert_eq!(dump("(?<name>a)"), "group_namedCapture<name>(a)");
    assert_eq!(dump("(?'name'a)"), "group_namedCapture<name>(a)");
    assert_eq!(dump("(?P<name>a)"), "group_namedCapture<name>(a)");
    assert_eq!(dump("(?<new-old>a)"), "group_balancedCapture<new-old>(a)");
    assert_eq!(dump("(?<-old>a)"), "group_balancedCapture<-old>(a)");
    assert_eq!(dump("(*sr:ab)"), "group_scriptRun((a,b))");
    assert_eq!(dump("(*asr:a)"), "group_atomicScriptRun(a)");
}

#[test]
fn matching_option_groups() {
    assert_eq!(
        dump("(?im-x:a)"),
        "group_changeMatchingOptions<im-x>(a)"
    );
    assert_eq!(
        dump("a(?i)b"),
        "(a,group_changeMatchingOptions<i>(empty),b)"
    );
    assert_eq!(
        dump("(?^i:a)"),
        "group_changeMatchingOptions<^i>(a)"
    );
    // (?x:…) turns on non-semantic whitespace for its body only.
    assert_eq!(
        dump("(?x:a b) c"),
        "(group_changeMatchingOptions<x>((a,b)), ,c)"
    );
}

#[test]
fn isolated_extended_option_scopes_to_enclosing_group() {
    // Inside the group, (?x) makes the space trivia; outside it, the space
    // is a literal again.
    assert_eq!(
        dump("((?x)a b) c"),
        "(group_capture((group_changeMatchingOptions<x>(empty),a,b)), ,c)"
    );
}

#[test]
fn escapes_and_scalars() {
    assert_eq!(dump(r"\d\w\s"), r"(\d,\w,\s)");
    assert_eq!(dump(r"\A\z\b"), r"(\A,\z,\b)");
    assert_eq!(dump(r"\x41"), "A");
    assert_eq!(dump(r"\u{42}"), "B");
    assert_eq!(dump(r"\101"), "A");
    assert_eq!(dump(r"\N{SNOWMAN}"), r"\N{SNOWMAN}");
    assert_eq!(dump(r"\cA"), r"\cA");
    assert_eq!(dump(r"\M-a"), r"\M-a");
    assert_eq!(dump(r"\."), ".");
    assert_eq!(dump("."), ".");
    assert_eq!(dump("^a$"), "(^,a,$)");
}

#[test]
fn properties() {
    assert_eq!(dump(r"\p{Lu}"), r"\p{Lu}");
    assert_eq!(dump(r"\P{Alpha}"), r"\P{Alpha}");
    assert_eq!(dump(r"\p{script=Greek}"), r"\p{script=Greek}");
    assert_eq!(dump(r"\pL"), r"\p{L}");
    assert_eq!(dump(r"\p{Quux}"), r"\p{Quux}");
}

#[test]
fn backreferences_and_subpatterns() {
    assert_eq!(
        dump(r"(a)(b)\2"),
        r"(group_capture(a),group_capture(b),\2)"
    );
    // \2 with only one prior group reads as an octal scalar.
    assert_eq!(dump(r"(a)\2"), "(group_capture(a),\u{2})");
    assert_eq!(
        dump(r"(?<x>a)\k<x>"),
        r"(group_namedCapture<x>(a),\k<x>)"
    );
    assert_eq!(dump(r"(a)\g{-1}"), r"(group_capture(a),\g{-1})");
    assert_eq!(dump(r"\g<sub>"), r"\g<sub>");
    assert_eq!(dump("(?R)"), "(?R)");
    assert_eq!(dump("(?0)"), "(?R)");
    assert_eq!(dump("(?2)"), "(?2)");
    assert_eq!(dump("(?-1)"), "(?-1)");
    assert_eq!(dump("(?&name)"), r"\g<name>");
    assert_eq!(dump("(?P>name)"), r"\g<name>");
    assert_eq!(dump("(?P=name)"), r"\k<name>");
    assert_eq!(dump(r"\k<up+2>"), r"\k<up+2>");
}

#[test]
fn callouts_and_directives() {
    assert_eq!(dump("a(?C1)b"), "(a,(?C1),b)");
    assert_eq!(dump("(?C)"), "(?C0)");
    assert_eq!(dump("(?C\"note\")"), "(?C\"note\")");
    assert_eq!(dump("(*onig{arg})"), "(*onig{arg})");
    assert_eq!(dump("a(*SKIP)b"), "(a,(*SKIP),b)");
    assert_eq!(dump("(*MARK:here)"), "(*MARK:here)");
    assert_eq!(dump("(*:here)"), "(*MARK:here)");
}

#[test]
fn quotes_and_comments() {
    assert_eq!(dump(r"\Qa+b\Ec"), "(quote(a+b),c)");
    assert_eq!(dump(r"\Qab"), "quote(ab)");
    assert_eq!(dump(r"\q{lit}x"), "(quote(lit),x)");
    assert_eq!(dump("a(?#comment)b"), "(a,b)");
}

#[test]
fn extended_syntax_trivia() {
    assert_eq!(dump_extended("a b"), "(a,b)");
    assert_eq!(dump_extended("a # rest\nb"), "(a,b)");
    // Quantifiers reach across the skipped whitespace.
    assert_eq!(dump_extended("a *"), "quant_zeroOrMore_eager(a)");
    // Comments are invisible to quantifiers in every mode.
    assert_eq!(dump("a(?#c)*"), "quant_zeroOrMore_eager(a)");
}

#[test]
fn custom_classes() {
    assert_eq!(dump("[abc]"), "customCharacterClass(a,b,c)");
    assert_eq!(dump("[^ab]"), "customCharacterClass(^,a,b)");
    assert_eq!(dump("[a-z0-9_]"), "customCharacterClass(a-z,0-9,_)");
    assert_eq!(dump("[a-]"), "customCharacterClass(a,-)");
    assert_eq!(dump("[-a]"), "customCharacterClass(-,a)");
    assert_eq!(dump("[]a]"), "customCharacterClass(],a)");
    assert_eq!(dump("[a[bc]]"), "customCharacterClass(a,customCharacterClass(b,c))");
    assert_eq!(dump(r"[\d\-]"), r"customCharacterClass(\d,-)");
    assert_eq!(dump(r"[\x41-\x45]"), "customCharacterClass(A-E)");
    assert_eq!(dump("[[:alpha:]]"), "customCharacterClass([:alpha:])");
    assert_eq!(dump("[[:^digit:]x]"), "customCharacterClass([:^digit:],x)");
    assert_eq!(dump("a[b]?"), "(a,quant_zeroOrOne_eager(customCharacterClass(b)))");
}

#[test]
fn class_set_operations() {
    assert_eq!(
        dump("[a-z&&[^aeiou]]"),
        "customCharacterClass(op [a-z] intersection [customCharacterClass(^,a,e,i,o,u)])"
    );
    assert_eq!(
        dump("[a--b]"),
        "customCharacterClass(op [a] subtraction [b])"
    );
    assert_eq!(
        dump("[ab~~cd]"),
        "customCharacterClass(op [a,b] symmetricDifference [c,d])"
    );
    // Left-associative chaining.
    assert_eq!(
        dump("[a--b--c]"),
        "customCharacterClass(op [op [a] subtraction [b]] subtraction [c])"
    );
}

#[test]
fn conditionals() {
    assert_eq!(dump("(?(1)a|b)"), "if matched<1> then a else b");
    assert_eq!(dump("(?(1)a)"), "if matched<1> then a else empty");
    assert_eq!(dump("(?(<x>)yes|no)"), "if matched<x> then (y,e,s) else (n,o)");
    assert_eq!(dump("(?('x')y|n)"), "if matched<x> then y else n");
    assert_eq!(dump("(?(name)y|n)"), "if matched<name> then y else n");
    assert_eq!(dump("(?(R)a|b)"), "if recursion then a else b");
    assert_eq!(dump("(?(R2)a|b)"), "if recursion<2> then a else b");
    assert_eq!(dump("(?(R&f)a|b)"), "if recursion<f> then a else b");
    assert_eq!(dump("(?(+1)a|b)"), "if matched<+1> then a else b");
    assert_eq!(dump("(?(DEFINE)(?<f>x))"), "if define then group_namedCapture<f>(x) else empty");
    assert_eq!(
        dump("(?(VERSION>=10.4)a|b)"),
        "if version>=10.4 then a else b"
    );
    assert_eq!(
        dump("(?(?=ab)y|n)"),
        "if group_lookahead((a,b)) then y else n"
    );
}

#[test]
fn absent_functions() {
    assert_eq!(dump("(?~ab)"), "absentFunction_repeater((a,b))");
    assert_eq!(dump("(?~|a)"), "absentFunction_stopper(a)");
    assert_eq!(dump("(?~|)"), "absentFunction_clearer");
    assert_eq!(
        dump("(?~|foo|bar)"),
        "absentFunction_expression((f,o,o),(b,a,r))"
    );
    // Nested absent functions are undefined in Oniguruma but parse
    // structurally.
    assert_eq!(
        dump("(?~(?~a))"),
        "absentFunction_repeater(absentFunction_repeater(a))"
    );
}

#[test]
fn global_matching_options() {
    assert_eq!(
        dump("(*UTF)(*UCP)a"),
        "globalMatchingOptions((*UTF),(*UCP))(a)"
    );
    assert_eq!(
        dump("(*LIMIT_MATCH=42)a"),
        "globalMatchingOptions((*LIMIT_MATCH=42))(a)"
    );
    // Mid-pattern (*UTF) is not a global option; it lexes as a callout.
    assert_eq!(dump("a(*UTF)"), "(a,(*UTF))");
}

#[test]
fn delimited_parses() {
    assert_eq!(parse_with_delimiters("/a|b/").unwrap().dump(), "alternation(a,b)");
    assert_eq!(parse_with_delimiters("re'a+'").unwrap().dump(), "quant_oneOrMore_eager(a)");
    assert_eq!(parse_with_delimiters("rx'a b'").unwrap().dump(), "(a,b)");
    assert_eq!(parse_with_delimiters("#/\na b\n/#").unwrap().dump(), "(a,b)");
    assert_eq!(parse_with_delimiters("|a b|").unwrap().dump(), "(a,b)");
}

#[test]
fn ecmascript_empty_class() {
    let ast = parse("[]", SyntaxOptions::ECMASCRIPT).unwrap();
    assert_eq!(ast.dump(), "customCharacterClass()");
}
