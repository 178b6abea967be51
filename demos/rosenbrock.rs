use downhill::nalgebra as na;
use downhill::{Function, OptimizerDriver, Problem};
use na::{Dyn, IsContiguous};

// https://en.wikipedia.org/wiki/Rosenbrock_function
struct Rosenbrock {
    a: f64,
    b: f64,
}

impl Problem for Rosenbrock {
    type Field = f64;
}

impl Function for Rosenbrock {
    fn apply<Sx>(&self, x: &na::Vector<Self::Field, Dyn, Sx>) -> Self::Field
    where
        Sx: na::storage::Storage<Self::Field, Dyn> + IsContiguous,
    {
        (self.a - x[0]).powi(2) + self.b * (x[1] - x[0].powi(2)).powi(2)
    }
}

fn main() -> Result<(), String> {
    let f = Rosenbrock { a: 1.0, b: 100.0 };
    let mut optimizer = OptimizerDriver::builder(&f)
        .with_initial(vec![-1.2, 1.0])
        .with_delta(0.5)
        .build()
        .map_err(|error| format!("{error}"))?;

    let (_, fx) = optimizer
        .find(|state| {
            println!(
                "iter = {}\tf(x) = {}\tx = {:?}",
                state.iter(),
                state.fx(),
                state.x()
            );
            state.iter() >= 1000
        })
        .map_err(|error| format!("{error}"))?;

    println!(
        "{}: f(x) = {} after {} evaluations",
        optimizer.name(),
        fx,
        optimizer.evaluations()
    );

    if optimizer.is_converged() {
        Ok(())
    } else {
        Err("did not converge".to_string())
    }
}
