// src/script/printer.rs

use crate::ir::{evaluate, Instruction, Program};

/// Renders a program as a script that compiles back to the same chain.
///
/// Each position is named after its value in binary (`_1011` holds 11), with
/// position 0 written as the literal `1`. A shift whose only reader is the
/// addition right after it is folded into a single `shl … add` line, and the
/// final instruction becomes the `return` line.
///
/// # Examples
/// ```
/// use addchain::ir::Program;
/// use addchain::script::{compile, decompile};
///
/// let mut p = Program::new();
/// p.double(0).unwrap();
/// p.add(1, 0).unwrap();
/// assert_eq!(decompile(&p), "_10 = dbl 1\nreturn _10 add 1\n");
/// assert_eq!(compile(&decompile(&p)).unwrap(), p);
/// ```
pub fn decompile(program: &Program) -> String {
    let values = evaluate(program).into_values();
    let name = |position: usize| {
        if position == 0 {
            "1".to_string()
        } else {
            format!("_{:b}", values[position])
        }
    };

    let instructions = program.instructions();
    let reads = program.read_counts();
    let mut out = String::new();

    if instructions.is_empty() {
        out.push_str("return 1\n");
        return out;
    }

    let mut i = 0;
    while i < instructions.len() {
        let mut position = i + 1;
        let expr = match instructions[i] {
            Instruction::Shift(x, s) => match fused_addend(instructions, &reads, i) {
                Some(y) => {
                    i += 1;
                    position += 1;
                    format!("{} shl {} add {}", name(x), s, name(y))
                }
                None => format!("{} shl {}", name(x), s),
            },
            Instruction::Add(x, y) => format!("{} add {}", name(x), name(y)),
            Instruction::Double(x) => format!("dbl {}", name(x)),
        };

        if position == instructions.len() {
            out.push_str(&format!("return {}\n", expr));
        } else {
            out.push_str(&format!("{} = {}\n", name(position), expr));
        }
        i += 1;
    }
    out
}

/// If the shift at instruction i is read only by an addition at i + 1, returns
/// that addition's other operand.
fn fused_addend(instructions: &[Instruction], reads: &[usize], i: usize) -> Option<usize> {
    let shifted = i + 1;
    if reads[shifted] != 1 {
        return None;
    }
    match instructions.get(i + 1) {
        Some(&Instruction::Add(x, y)) if x == shifted => Some(y),
        Some(&Instruction::Add(x, y)) if y == shifted => Some(x),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Chain;
    use crate::integer_math::bigints::from_u64s;
    use crate::script::compile;

    #[test]
    fn test_plain_program() {
        let chain = Chain::from_values(from_u64s(&[1, 2, 3, 6, 12, 15]));
        let text = decompile(&chain.program().unwrap());
        assert_eq!(
            text,
            "_10 = dbl 1\n_11 = 1 add _10\n_110 = dbl _11\n_1100 = dbl _110\nreturn _11 add _1100\n"
        );
    }

    #[test]
    fn test_shift_add_is_fused() {
        let mut p = Program::new();
        p.double(0).unwrap(); // 2
        p.add(0, 1).unwrap(); // 3
        p.shift(2, 2).unwrap(); // 12
        p.add(2, 3).unwrap(); // 15
        p.shift(4, 4).unwrap(); // 240
        p.add(5, 4).unwrap(); // 255
        assert_eq!(
            decompile(&p),
            "_10 = dbl 1\n_11 = 1 add _10\n_1111 = _11 shl 2 add _11\nreturn _1111 shl 4 add _1111\n"
        );
    }

    #[test]
    fn test_shared_shift_is_not_fused() {
        let mut p = Program::new();
        p.shift(0, 3).unwrap(); // 8
        p.add(1, 1).unwrap(); // 16
        let text = decompile(&p);
        assert_eq!(text, "_1000 = 1 shl 3\nreturn _1000 add _1000\n");
        assert_eq!(compile(&text).unwrap(), p);
    }

    #[test]
    fn test_empty_program() {
        let p = Program::new();
        assert_eq!(compile(&decompile(&p)).unwrap(), p);
    }
}
