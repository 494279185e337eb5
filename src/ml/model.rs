use burn::{
    nn::{Dropout, DropoutConfig, Linear, LinearConfig, Relu},
    prelude::*,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct MlpRegressorConfig {
    pub input_dim:  usize,
    pub hidden_dim: usize,
    pub dropout:    f64,
}

impl MlpRegressorConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> MlpRegressor<B> {
        let input_layer  = LinearConfig::new(self.input_dim, self.hidden_dim).init(device);
        let hidden_layer = LinearConfig::new(self.hidden_dim, self.hidden_dim).init(device);
        let output_head  = LinearConfig::new(self.hidden_dim, 1).init(device);
        let activation   = Relu::new();
        let dropout      = DropoutConfig::new(self.dropout).init();
        MlpRegressor {
            input_layer, hidden_layer, output_head,
            activation, dropout,
        }
    }
}

#[derive(Module, Debug)]
pub struct MlpRegressor<B: Backend> {
    pub input_layer:  Linear<B>,
    pub hidden_layer: Linear<B>,
    pub output_head:  Linear<B>,
    pub activation:   Relu,
    pub dropout:      Dropout,
}

impl<B: Backend> MlpRegressor<B> {
    /// features: [batch, n_features] → predictions: [batch, 1]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.activation.forward(self.input_layer.forward(features));
        let x = self.dropout.forward(x);
        let x = self.activation.forward(self.hidden_layer.forward(x));
        let x = self.dropout.forward(x);
        self.output_head.forward(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_forward_shape() {
        let device = Default::default();
        let model = MlpRegressorConfig::new(5, 16, 0.0).init::<TestBackend>(&device);
        let input = Tensor::<TestBackend, 2>::zeros([7, 5], &device);
        let output = model.forward(input);
        assert_eq!(output.dims(), [7, 1]);
    }
}
