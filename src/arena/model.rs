//! Deep CFR policy network and the provider that queries it.
//!
//! The network artifact is a safetensors file with this layout:
//!
//! ```text
//! hidden.{i}.weight / .bias   [h_i, h_{i-1}]   ReLU, i = 0..n
//! normalization.weight / .bias [h_n]           layer norm
//! last.weight / .bias         [l, h_n]         leaky ReLU
//! output.weight / .bias       [A, l]           masked softmax
//! ```
//!
//! `A` is the artifact's fixed action width. The network takes the
//! information-state tensor together with a 0/1 legal-action mask of width
//! `A`, and returns a distribution over all `A` slots.

use std::collections::HashMap;
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::{layer_norm, linear, LayerNorm, Linear, Module, VarBuilder};

use crate::arena::game::Action;
use crate::arena::provider::PolicyProvider;
use crate::error::{ArenaError, ArenaResult};

/// Negative slope of the activation after the `last` layer.
const LEAKY_RELU_SLOPE: f64 = 0.2;

/// Epsilon of the layer normalization.
const LAYER_NORM_EPS: f64 = 1e-3;

/// Logit assigned to masked-out actions before the softmax.
const MASKED_LOGIT: f64 = -1e20;

/// Inference seam between the provider and the tensor runtime.
pub trait PolicyModel: Send + Sync {
    /// Expected length of the feature vector.
    fn input_size(&self) -> usize;

    /// Width of the mask and of the output vector.
    fn max_action_width(&self) -> usize;

    /// Run the model on one feature vector and its legal-action mask.
    fn infer(&self, features: &[f32], mask: &[u8]) -> ArenaResult<Vec<f32>>;
}

/// Layer sizes of a [`PolicyNetwork`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkShape {
    /// Length of the information-state tensor.
    pub input_size: usize,
    /// Width of each ReLU hidden layer, in order.
    pub hidden: Vec<usize>,
    /// Width of the leaky-ReLU layer before the output.
    pub last: usize,
    /// Action width of the output layer.
    pub num_actions: usize,
}

impl NetworkShape {
    /// Read the layer sizes off a set of named weight tensors.
    pub fn from_tensors(tensors: &HashMap<String, Tensor>) -> ArenaResult<Self> {
        let mut hidden = Vec::new();
        let mut input_size = 0;
        while let Some(weight) = tensors.get(&format!("hidden.{}.weight", hidden.len())) {
            let (out_dim, in_dim) = weight.dims2()?;
            if hidden.is_empty() {
                input_size = in_dim;
            }
            hidden.push(out_dim);
        }
        if hidden.is_empty() {
            return Err(ArenaError::Inference(
                "model artifact has no hidden layers".into(),
            ));
        }

        let (last, _) = matrix_dims(tensors, "last.weight")?;
        let (num_actions, _) = matrix_dims(tensors, "output.weight")?;

        Ok(Self {
            input_size,
            hidden,
            last,
            num_actions,
        })
    }
}

fn matrix_dims(tensors: &HashMap<String, Tensor>, name: &str) -> ArenaResult<(usize, usize)> {
    let tensor = tensors.get(name).ok_or_else(|| {
        ArenaError::Inference(format!("model artifact is missing tensor {:?}", name))
    })?;
    Ok(tensor.dims2()?)
}

/// Feed-forward policy network trained by Deep CFR.
pub struct PolicyNetwork {
    hidden: Vec<Linear>,
    normalization: LayerNorm,
    last: Linear,
    output: Linear,
    shape: NetworkShape,
    device: Device,
}

impl PolicyNetwork {
    /// Build the network from a variable store.
    ///
    /// With a `VarMap`-backed builder this creates fresh weights; with a
    /// tensor-backed builder it checks every stored tensor against `shape`.
    pub fn new(shape: &NetworkShape, vb: VarBuilder) -> ArenaResult<Self> {
        let mut hidden = Vec::with_capacity(shape.hidden.len());
        let mut in_dim = shape.input_size;
        for (i, &out_dim) in shape.hidden.iter().enumerate() {
            hidden.push(linear(in_dim, out_dim, vb.pp(format!("hidden.{}", i)))?);
            in_dim = out_dim;
        }
        let normalization = layer_norm(in_dim, LAYER_NORM_EPS, vb.pp("normalization"))?;
        let last = linear(in_dim, shape.last, vb.pp("last"))?;
        let output = linear(shape.last, shape.num_actions, vb.pp("output"))?;

        Ok(Self {
            hidden,
            normalization,
            last,
            output,
            shape: shape.clone(),
            device: vb.device().clone(),
        })
    }

    /// Load a network from a safetensors artifact.
    pub fn load<P: AsRef<Path>>(path: P, device: &Device) -> ArenaResult<Self> {
        let path = path.as_ref();
        let tensors = candle_core::safetensors::load(path, device).map_err(|e| {
            ArenaError::Inference(format!("cannot load model {}: {}", path.display(), e))
        })?;
        let shape = NetworkShape::from_tensors(&tensors)?;
        let vb = VarBuilder::from_tensors(tensors, DType::F32, device);
        let net = Self::new(&shape, vb)?;

        log::info!(
            "{:<32}{:<32}",
            format!("loaded model {:?}", shape.hidden),
            path.display()
        );
        Ok(net)
    }

    /// Forward pass.
    ///
    /// `features`: `[B, input_size]` f32, `mask`: `[B, num_actions]` u8.
    /// Returns `[B, num_actions]` probabilities with zeros at masked slots.
    pub fn forward(&self, features: &Tensor, mask: &Tensor) -> candle_core::Result<Tensor> {
        let mut x = features.clone();
        for layer in &self.hidden {
            x = layer.forward(&x)?.relu()?;
        }
        x = self.normalization.forward(&x)?;
        x = self.last.forward(&x)?;
        x = x.maximum(&(&x * LEAKY_RELU_SLOPE)?)?;

        let logits = self.output.forward(&x)?;
        let masked = (logits.zeros_like()? + MASKED_LOGIT)?;
        let logits = mask.where_cond(&logits, &masked)?;
        candle_nn::ops::softmax_last_dim(&logits)
    }

    /// Layer sizes of this network.
    pub fn shape(&self) -> &NetworkShape {
        &self.shape
    }
}

impl PolicyModel for PolicyNetwork {
    fn input_size(&self) -> usize {
        self.shape.input_size
    }

    fn max_action_width(&self) -> usize {
        self.shape.num_actions
    }

    fn infer(&self, features: &[f32], mask: &[u8]) -> ArenaResult<Vec<f32>> {
        if features.len() != self.shape.input_size {
            return Err(ArenaError::Inference(format!(
                "model expects {} features, got {}",
                self.shape.input_size,
                features.len()
            )));
        }
        if mask.len() != self.shape.num_actions {
            return Err(ArenaError::Inference(format!(
                "model expects a mask of width {}, got {}",
                self.shape.num_actions,
                mask.len()
            )));
        }

        let x = Tensor::from_slice(features, (1, features.len()), &self.device)?;
        let m = Tensor::from_slice(mask, (1, mask.len()), &self.device)?;
        let probs = self.forward(&x, &m)?;
        Ok(probs.squeeze(0)?.to_vec1::<f32>()?)
    }
}

/// Provider backed by a trained network.
pub struct ModelPolicyProvider<M = PolicyNetwork> {
    model: M,
}

impl ModelPolicyProvider<PolicyNetwork> {
    /// Load a network artifact on the CPU.
    ///
    /// `max_action_width` is the mask width the artifact was trained with;
    /// a mismatch is reported as an inference error.
    pub fn load<P: AsRef<Path>>(path: P, max_action_width: usize) -> ArenaResult<Self> {
        let model = PolicyNetwork::load(path, &Device::Cpu)?;
        Self::new(model, max_action_width)
    }
}

impl<M: PolicyModel> ModelPolicyProvider<M> {
    /// Wrap a model whose action width must equal `max_action_width`.
    pub fn new(model: M, max_action_width: usize) -> ArenaResult<Self> {
        if model.max_action_width() != max_action_width {
            return Err(ArenaError::Inference(format!(
                "model action width is {}, configured width is {}",
                model.max_action_width(),
                max_action_width
            )));
        }
        Ok(Self { model })
    }

    /// Get reference to the wrapped model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// 0/1 mask over the model's action width with ones at `legal_actions`.
    pub fn build_mask(&self, legal_actions: &[Action]) -> ArenaResult<Vec<u8>> {
        let width = self.model.max_action_width();
        let mut mask = vec![0u8; width];
        for &action in legal_actions {
            let slot = mask.get_mut(action).ok_or_else(|| {
                ArenaError::Inference(format!(
                    "action {} is outside the model action width {}",
                    action, width
                ))
            })?;
            *slot = 1;
        }
        Ok(mask)
    }
}

impl<M: PolicyModel> PolicyProvider for ModelPolicyProvider<M> {
    fn name(&self) -> &str {
        "model"
    }

    fn get_policy(
        &self,
        _info_state_key: &str,
        info_state_tensor: &[f32],
        legal_actions: &[Action],
    ) -> ArenaResult<Vec<f64>> {
        let mask = self.build_mask(legal_actions)?;
        let output = self.model.infer(info_state_tensor, &mask)?;
        if output.len() != mask.len() {
            return Err(ArenaError::Inference(format!(
                "model returned {} values, expected {}",
                output.len(),
                mask.len()
            )));
        }
        Ok(legal_actions
            .iter()
            .map(|&action| f64::from(output[action]))
            .collect())
    }
}
