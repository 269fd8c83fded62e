// Copyright 2025 Cameron Swords
// SPDX-License-Identifier: Apache-2.0
