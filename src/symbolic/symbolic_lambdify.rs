use crate::symbolic::symbolic_engine::Expr;

/// Compiled function of one argument. `Send + Sync` so that samplers may call it from worker threads.
pub type Lambdified1D = Box<dyn Fn(f64) -> f64 + Send + Sync>;

impl Expr {
    /// LAMBDIFICATION - Converting Symbolic Expressions to Executable Functions

    /// Converts an expression into a closure of the single variable `var`.
    ///
    /// The argument is passed on every call, so the closure holds no mutable state and
    /// can be shared between threads. Variables other than `var` evaluate to NaN: callers
    /// are expected to reject them beforehand (see `Expr::eval`).
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Expr::Var("x".to_string());
    /// let f = x.pow(Expr::Const(2.0)); // x^2
    /// let func = f.lambdify1D("x");
    /// assert_eq!(func(3.0), 9.0);
    /// ```
    pub fn lambdify1D(&self, var: &str) -> Lambdified1D {
        match self {
            Expr::Var(name) if name == var => Box::new(|x| x),
            Expr::Var(_) => Box::new(|_| f64::NAN),
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D(var);
                let rhs_fn = rhs.lambdify1D(var);
                Box::new(move |x| lhs_fn(x) + rhs_fn(x))
            }
            Expr::Sub(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D(var);
                let rhs_fn = rhs.lambdify1D(var);
                Box::new(move |x| lhs_fn(x) - rhs_fn(x))
            }
            Expr::Mul(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D(var);
                let rhs_fn = rhs.lambdify1D(var);
                Box::new(move |x| lhs_fn(x) * rhs_fn(x))
            }
            Expr::Div(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D(var);
                let rhs_fn = rhs.lambdify1D(var);
                Box::new(move |x| lhs_fn(x) / rhs_fn(x))
            }
            Expr::Pow(base, exp) => match exp.as_ref() {
                // integer exponents keep negative bases defined: (-2)^2 = 4
                Expr::Const(n) if n.fract() == 0.0 && n.abs() <= i32::MAX as f64 => {
                    let n = *n as i32;
                    let base_fn = base.lambdify1D(var);
                    Box::new(move |x| base_fn(x).powi(n))
                }
                _ => {
                    let base_fn = base.lambdify1D(var);
                    let exp_fn = exp.lambdify1D(var);
                    Box::new(move |x| base_fn(x).powf(exp_fn(x)))
                }
            },
            Expr::Func(func, arg) => {
                let func = *func;
                let arg_fn = arg.lambdify1D(var);
                Box::new(move |x| func.apply(arg_fn(x)))
            }
        }
    } // end of lambdify1D
}

#[cfg(test)]
mod tests {
    use crate::symbolic::symbolic_engine::{Environment, Expr};
    use approx::assert_relative_eq;

    #[test]
    fn test_lambdify_matches_eval() {
        let formulas = [
            "x^2 + x + 1",
            "sin(x) * exp(-x)",
            "sqrt(abs(x)) / (1 + x^2)",
            "2^x - log(x^2 + 1)",
            "atan(x) + acot(x)",
        ];
        for formula in formulas {
            let expr = Expr::parse_expression(formula).unwrap();
            let func = expr.lambdify1D("x");
            for k in 0..=20 {
                let x = -2.0 + 0.2 * k as f64;
                let expected = expr.eval(&Environment::single("x", x)).unwrap();
                assert_relative_eq!(func(x), expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_integer_power_of_negative_base() {
        let func = Expr::parse_expression("x^3").unwrap().lambdify1D("x");
        assert_relative_eq!(func(-2.0), -8.0);
    }

    #[test]
    fn test_foreign_variable_is_nan() {
        let func = Expr::parse_expression("x + y").unwrap().lambdify1D("x");
        assert!(func(1.0).is_nan());
    }

    #[test]
    fn test_closure_is_shareable_between_threads() {
        let func = std::sync::Arc::new(Expr::parse_expression("x * 2").unwrap().lambdify1D("x"));
        let handles: Vec<_> = (0..4)
            .map(|k| {
                let func = func.clone();
                std::thread::spawn(move || func(k as f64))
            })
            .collect();
        let results: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![0.0, 2.0, 4.0, 6.0]);
    }
}
